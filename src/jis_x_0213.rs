use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Kuten (plane, row, cell) to character lookup used to resolve external
/// character references.
pub trait JisLookup {
    fn lookup(&self, plane: usize, row: usize, cell: usize) -> Option<char>;
}

#[derive(Deserialize)]
struct JisX0213Entry {
    plane: usize,
    row: usize,
    cell: usize,
    char: String,
}

/// JIS X 0213 table loaded from a JSON array of
/// `{"plane": 1, "row": 1, "cell": 1, "char": "　"}` entries.
#[derive(Debug, Default)]
pub struct JisX0213Table {
    chars: HashMap<(usize, usize, usize), char>,
}

impl JisX0213Table {
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<JisX0213Entry> =
            serde_json::from_str(json).context("Failed to parse JIS X 0213 table")?;

        let mut chars = HashMap::with_capacity(entries.len());
        for entry in entries {
            // 結合文字列で表される区点は 1 文字にならないので飛ばす
            let mut cs = entry.char.chars();
            if let (Some(c), None) = (cs.next(), cs.next()) {
                chars.insert((entry.plane, entry.row, entry.cell), c);
            }
        }

        Ok(Self { chars })
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl JisLookup for JisX0213Table {
    fn lookup(&self, plane: usize, row: usize, cell: usize) -> Option<char> {
        self.chars.get(&(plane, row, cell)).copied()
    }
}

impl<F> JisLookup for F
where
    F: Fn(usize, usize, usize) -> Option<char>,
{
    fn lookup(&self, plane: usize, row: usize, cell: usize) -> Option<char> {
        self(plane, row, cell)
    }
}
