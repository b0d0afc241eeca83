//! The shared dictionaries behind every tokenizer.
//!
//! A [`Dictionaries`] value is built once (from a directory, from a bincode
//! snapshot, or in code) and shared behind an `Arc`. Matching only takes a
//! read lock on the phrase trie; runtime phrase additions take the write
//! lock and are visible to tokenizations started afterwards.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use pinyin_analysis_core::errors::{DictionaryError, Result};
use pinyin_analysis_core::{decode_str, Rune, Trie};
use serde::{Deserialize, Serialize};

use crate::alphabet::LatinSegmenter;
use crate::char_table::CharTable;
use crate::format::PinyinFormat;
use crate::resolver::PinyinResolver;
use crate::syllables::SyllableDict;

/// Per-codepoint default readings, one line per codepoint from U+4E00.
pub const CHAR_TABLE_FILE: &str = "pinyin.txt";
/// Phrase overrides, `word=reading reading ...`.
pub const PHRASE_FILE: &str = "polyphone.txt";
/// Latin syllables, one per line.
pub const SYLLABLE_FILE: &str = "pinyin_alphabet.dict";

pub type PhraseTrie = Trie<Vec<String>>;

#[derive(Debug, Default)]
pub struct Dictionaries {
    phrases: RwLock<PhraseTrie>,
    chars: CharTable,
    syllables: SyllableDict,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    phrases: &'a PhraseTrie,
    chars: &'a CharTable,
    syllables: &'a SyllableDict,
}

#[derive(Deserialize)]
struct Snapshot {
    phrases: PhraseTrie,
    chars: CharTable,
    syllables: SyllableDict,
}

impl Dictionaries {
    pub fn new(phrases: PhraseTrie, chars: CharTable, syllables: SyllableDict) -> Self {
        Self {
            phrases: RwLock::new(phrases),
            chars,
            syllables,
        }
    }

    /// Load the three dictionary files from `dir`.
    ///
    /// A missing or unreadable file leaves its table empty; a warning is
    /// logged and loading continues.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let chars = CharTable::load(dir.join(CHAR_TABLE_FILE)).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "char table unavailable, no single-character readings");
            CharTable::new()
        });
        let phrases = load_phrases(dir.join(PHRASE_FILE)).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "phrase dictionary unavailable, no phrase overrides");
            PhraseTrie::new()
        });
        let syllables = SyllableDict::load(dir.join(SYLLABLE_FILE)).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "syllable dictionary unavailable, latin runs stay whole");
            SyllableDict::empty()
        });
        Self::new(phrases, chars, syllables)
    }

    /// Persist all tables to a bincode snapshot.
    pub fn save_bincode<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let p = path.as_ref();
        let f = File::create(p).map_err(|e| DictionaryError::io(p, e))?;
        let phrases = self.phrases();
        let snapshot = SnapshotRef {
            phrases: &phrases,
            chars: &self.chars,
            syllables: &self.syllables,
        };
        let mut writer = BufWriter::new(f);
        bincode::serialize_into(&mut writer, &snapshot)?;
        writer.flush().map_err(|e| DictionaryError::io(p, e))?;
        Ok(())
    }

    pub fn load_bincode<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let f = File::open(p).map_err(|e| DictionaryError::io(p, e))?;
        let snapshot: Snapshot = bincode::deserialize_from(BufReader::new(f))?;
        tracing::debug!(
            path = %p.display(),
            phrases = snapshot.phrases.len(),
            chars = snapshot.chars.len(),
            "loaded dictionary snapshot"
        );
        Ok(Self::new(snapshot.phrases, snapshot.chars, snapshot.syllables))
    }

    fn phrases(&self) -> RwLockReadGuard<'_, PhraseTrie> {
        self.phrases.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn phrases_mut(&self) -> RwLockWriteGuard<'_, PhraseTrie> {
        self.phrases.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ========== Administration ==========

    /// Add or replace a phrase override. Empty words or reading lists are
    /// ignored.
    pub fn insert_phrase(&self, word: &str, readings: Vec<String>) {
        if word.is_empty() || readings.is_empty() {
            return;
        }
        self.phrases_mut().insert(word, readings);
        tracing::debug!(word, "inserted phrase");
    }

    /// Drop a phrase override, keeping longer phrases that extend it.
    pub fn remove_phrase(&self, word: &str) -> bool {
        let removed = self.phrases_mut().remove(word);
        tracing::debug!(word, removed, "removed phrase");
        removed
    }

    pub fn phrase_readings(&self, word: &str) -> Option<Vec<String>> {
        self.phrases().get(word).cloned()
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases().len()
    }

    pub fn chars(&self) -> &CharTable {
        &self.chars
    }

    pub fn syllables(&self) -> &SyllableDict {
        &self.syllables
    }

    // ========== Conversion ==========

    /// Raw readings, one per rune.
    pub fn resolve(&self, runes: &[Rune]) -> Vec<String> {
        let phrases = self.phrases();
        PinyinResolver::new(&phrases, &self.chars).resolve(runes)
    }

    /// Raw readings, one per character of `text`.
    pub fn resolve_str(&self, text: &str) -> Vec<String> {
        self.resolve(&decode_str(text))
    }

    /// Readings of `text` rendered in `format`.
    ///
    /// Characters without a reading yield an empty string, or are skipped
    /// when the format asks for pinyin only.
    pub fn convert(&self, text: &str, format: &PinyinFormat) -> Vec<String> {
        self.resolve_str(text)
            .into_iter()
            .filter_map(|raw| {
                if raw.is_empty() {
                    (!format.only_pinyin).then(String::new)
                } else {
                    Some(format.format(&raw))
                }
            })
            .collect()
    }

    /// `中国` -> `["zhong", "guo"]`
    pub fn pinyin(&self, text: &str) -> Vec<String> {
        self.convert(text, &PinyinFormat::toneless())
    }

    /// `中国` -> `["z", "g"]`
    pub fn first_char(&self, text: &str) -> Vec<String> {
        self.convert(text, &PinyinFormat::abbr())
    }

    /// `中国` -> `["zhōng", "guó"]`
    pub fn unicode_pinyin(&self, text: &str) -> Vec<String> {
        self.convert(text, &PinyinFormat::unicode())
    }

    /// `中国` -> `["zhong1", "guo2"]`
    pub fn tone_pinyin(&self, text: &str) -> Vec<String> {
        self.convert(text, &PinyinFormat::tone_number())
    }

    /// Split a Latin run against the syllable dictionary.
    pub fn segment_latin(&self, run: &str) -> Vec<String> {
        LatinSegmenter::new(&self.syllables).segment(run)
    }
}

/// Parse phrase lines of the form `word=reading reading ...`.
///
/// Blank and `#` lines are skipped, as are lines without a word or without
/// readings.
pub fn parse_phrases<R: BufRead>(reader: R) -> std::io::Result<PhraseTrie> {
    let mut trie = PhraseTrie::new();
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((word, readings)) = line.split_once('=') else {
            continue;
        };
        let word = word.trim();
        let readings: Vec<String> = readings.split_whitespace().map(str::to_string).collect();
        if word.is_empty() || readings.is_empty() {
            continue;
        }
        trie.insert(word, readings);
    }
    Ok(trie)
}

pub fn load_phrases<P: AsRef<Path>>(path: P) -> Result<PhraseTrie> {
    let p = path.as_ref();
    let f = File::open(p).map_err(|e| DictionaryError::io(p, e))?;
    let trie = parse_phrases(BufReader::new(f)).map_err(|e| DictionaryError::io(p, e))?;
    tracing::debug!(path = %p.display(), phrases = trie.len(), "loaded phrase dictionary");
    Ok(trie)
}
