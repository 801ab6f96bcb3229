use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::{jis_x_0213::JisLookup, ruby_txt::error::ErrorKind, utility::str::parse_number};

/// External character addressed by JIS X 0213 kuten, e.g.
/// `「廴＋囘」、第4水準2-12-11`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JisChar {
    // [plane, row, cell] or [row, cell]
    pub code: Vec<usize>,
    pub level: Option<usize>,
    pub parts: Option<(String, String)>,
}

impl JisChar {
    /// Resolves the character through `table`. A two-part code is on plane 1.
    pub fn to_char(&self, table: &dyn JisLookup) -> Option<char> {
        match self.code[..] {
            [plane, row, cell] => table.lookup(plane, row, cell),
            [row, cell] => table.lookup(1, row, cell),
            _ => None,
        }
    }
}

/// External character addressed by Unicode code point, e.g.
/// `「ころもへん＋庫」、unicode8932`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnicodeChar {
    pub code: u32,
    pub parts: Option<(String, String)>,
}

impl UnicodeChar {
    pub fn to_char(&self) -> Option<char> {
        char::from_u32(self.code)
    }
}

pub fn parse_jis(spec: &str) -> Result<JisChar, ErrorKind> {
    static REGEX_JIS_CODE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"([0-9]+)-([0-9]+)(?:-([0-9]+))?").unwrap());
    static REGEX_JIS_LEVEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"第(.)水準").unwrap());

    let caps = REGEX_JIS_CODE
        .captures(spec)
        .ok_or_else(|| invalid_spec("JIS", "no code", spec))?;

    let mut code = Vec::with_capacity(3);
    for m in caps.iter().skip(1).flatten() {
        let n = m
            .as_str()
            .parse()
            .map_err(|_| invalid_spec("JIS", "code out of range", spec))?;
        code.push(n);
    }

    let level = match REGEX_JIS_LEVEL.captures(spec) {
        Some(caps) => Some(
            parse_number(&caps[1]).map_err(|e| invalid_spec("JIS", &e.to_string(), spec))?,
        ),
        None => None,
    };

    Ok(JisChar {
        code,
        level,
        parts: parse_parts(spec),
    })
}

pub fn parse_unicode(spec: &str) -> Result<UnicodeChar, ErrorKind> {
    static REGEX_UNICODE_KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)unicode").unwrap());
    static REGEX_UNICODE_CODE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)unicode([0-9a-f]{4})").unwrap());
    static REGEX_HEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)([0-9a-f]{4})").unwrap());

    let regex = if REGEX_UNICODE_KEYWORD.is_match(spec) {
        &*REGEX_UNICODE_CODE
    } else {
        &*REGEX_HEX
    };

    let caps = regex
        .captures(spec)
        .ok_or_else(|| invalid_spec("Unicode", "no code", spec))?;
    let code = u32::from_str_radix(&caps[1], 16)
        .map_err(|_| invalid_spec("Unicode", "invalid code", spec))?;

    Ok(UnicodeChar {
        code,
        parts: parse_parts(spec),
    })
}

// 「A＋B」 の形の字形説明
fn parse_parts(spec: &str) -> Option<(String, String)> {
    static REGEX_PARTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"「([^＋]+＋[^」]+)」").unwrap());

    let caps = REGEX_PARTS.captures(spec)?;
    let (first, rest) = caps.get(1)?.as_str().split_once('＋')?;
    if first.is_empty() || rest.is_empty() {
        return None;
    }
    Some((first.to_owned(), rest.to_owned()))
}

fn invalid_spec(kind: &str, reason: &str, spec: &str) -> ErrorKind {
    ErrorKind::Format(format!(
        "Cannot convert to {} char ({}): {}",
        kind, reason, spec
    ))
}
