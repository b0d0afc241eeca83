//! Default readings for single CJK Unified Ideographs.
//!
//! The table is a flat array covering U+4E00..=U+9FA5. The source file has
//! one line per codepoint in that range, in order, so line `n` describes
//! `U+4E00 + n`. Blank and `#` lines are placeholders: they leave their slot
//! empty but still advance the index.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use pinyin_analysis_core::errors::{DictionaryError, Result};
use serde::{Deserialize, Serialize};

pub const CJK_START: u32 = 0x4E00;
pub const CJK_END: u32 = 0x9FA5;

const SLOTS: usize = (CJK_END - CJK_START + 1) as usize;

/// Whether `ch` falls inside the range covered by [`CharTable`].
pub fn is_cjk(ch: char) -> bool {
    (CJK_START..=CJK_END).contains(&(ch as u32))
}

fn slot_of(ch: char) -> Option<usize> {
    is_cjk(ch).then(|| (ch as u32 - CJK_START) as usize)
}

/// Per-codepoint reading table.
///
/// Each slot holds the raw comma-separated readings from the dictionary
/// (`zhong1,zhong4`); [`CharTable::lookup`] returns the first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharTable {
    slots: Vec<String>,
}

impl Default for CharTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CharTable {
    /// An empty table: every lookup returns `None`.
    pub fn new() -> Self {
        Self {
            slots: vec![String::new(); SLOTS],
        }
    }

    /// Parse the positional line format.
    pub fn parse(text: &str) -> Self {
        let mut table = Self::new();
        for (idx, line) in text.lines().take(SLOTS).enumerate() {
            table.slots[idx] = slot_value(line).to_string();
        }
        table
    }

    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut table = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if idx >= SLOTS {
                break;
            }
            table.slots[idx] = slot_value(&line).to_string();
        }
        Ok(table)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let f = File::open(p).map_err(|e| DictionaryError::io(p, e))?;
        let table = Self::from_reader(BufReader::new(f)).map_err(|e| DictionaryError::io(p, e))?;
        tracing::debug!(path = %p.display(), entries = table.len(), "loaded char table");
        Ok(table)
    }

    /// Build a table from `(char, readings)` pairs; characters outside the
    /// covered range are ignored.
    ///
    /// ```
    /// use pinyin_analysis::CharTable;
    ///
    /// let table = CharTable::from_entries([('中', "zhong1,zhong4"), ('a', "ei1")]);
    /// assert_eq!(table.lookup('中'), Some("zhong1"));
    /// assert_eq!(table.lookup('a'), None);
    /// ```
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (char, &'a str)>,
    {
        let mut table = Self::new();
        for (ch, readings) in entries {
            table.set(ch, readings);
        }
        table
    }

    /// Replace the readings of `ch`. Returns false when `ch` is out of range.
    pub fn set(&mut self, ch: char, readings: &str) -> bool {
        match slot_of(ch) {
            Some(idx) => {
                self.slots[idx] = readings.trim().to_string();
                true
            }
            None => false,
        }
    }

    /// Default (first) reading of `ch`.
    pub fn lookup(&self, ch: char) -> Option<&str> {
        self.readings(ch).next()
    }

    /// Every reading listed for `ch`, in dictionary order.
    pub fn readings(&self, ch: char) -> impl Iterator<Item = &str> + '_ {
        slot_of(ch)
            .map(|idx| self.slots[idx].as_str())
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// Number of codepoints with at least one reading.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn slot_value(line: &str) -> &str {
    if line.is_empty() || line.starts_with('#') {
        return "";
    }
    line.split_once('=').map(|(_, v)| v.trim()).unwrap_or("")
}
