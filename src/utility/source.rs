use std::{fs::File, path::Path};

use anyhow::{bail, Context, Result};
use encoding_rs::{Encoding, SHIFT_JIS, UTF_8};
use log::warn;

use crate::utility::zip::ZipReader;

/// Character encoding of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    ShiftJis,
    Utf8,
}

impl SourceEncoding {
    pub fn of(name: &str) -> Result<Self> {
        match name.to_lowercase().replace('-', "_").as_str() {
            "shift_jis" | "sjis" | "cp932" => Ok(Self::ShiftJis),
            "utf_8" | "utf8" => Ok(Self::Utf8),
            _ => bail!("Unknown encoding: {}", name),
        }
    }

    fn encoding(self) -> &'static Encoding {
        match self {
            Self::ShiftJis => SHIFT_JIS,
            Self::Utf8 => UTF_8,
        }
    }
}

/// Decodes `bytes`. 変換できない文字は U+FFFD になる
pub fn decode(bytes: &[u8], encoding: SourceEncoding) -> String {
    let (text, _, had_errors) = encoding.encoding().decode(bytes);
    if had_errors {
        warn!("Some characters cannot be decoded as {:?}", encoding);
    }
    text.into_owned()
}

/// Reads a `.txt` file, or the `.txt` entry of a `.zip` file, as text.
pub fn read_source(path: &Path, encoding: SourceEncoding) -> Result<String> {
    let is_zip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));

    let bytes = if is_zip {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        ZipReader::new(file)?
            .read_single_txt()
            .with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
    };

    Ok(decode(&bytes, encoding))
}
