//! Context-sensitive reading resolution.
//!
//! Phrase dictionary hits decide the readings of the runes they cover; every
//! other rune takes its default reading from the char table.

use pinyin_analysis_core::{Rune, Trie};

use crate::char_table::CharTable;

/// Borrowed view over the two reading sources.
#[derive(Debug, Clone, Copy)]
pub struct PinyinResolver<'a> {
    phrases: &'a Trie<Vec<String>>,
    chars: &'a CharTable,
}

impl<'a> PinyinResolver<'a> {
    pub fn new(phrases: &'a Trie<Vec<String>>, chars: &'a CharTable) -> Self {
        Self { phrases, chars }
    }

    /// One raw reading per rune; empty where nothing is known.
    ///
    /// A phrase payload shorter than its phrase only covers the leading
    /// runes. Extra payload entries are ignored.
    pub fn resolve(&self, runes: &[Rune]) -> Vec<String> {
        let mut readings: Vec<Option<String>> = vec![None; runes.len()];

        for hit in self.phrases.matcher(runes) {
            tracing::trace!(phrase = %hit.text, start = hit.start, "phrase reading override");
            for (slot, reading) in readings[hit.start..hit.end].iter_mut().zip(hit.payload) {
                *slot = Some(reading.clone());
            }
        }

        readings
            .into_iter()
            .zip(runes)
            .map(|(reading, rune)| {
                reading.unwrap_or_else(|| self.chars.lookup(rune.ch).unwrap_or_default().to_string())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinyin_analysis_core::decode_str;

    fn table() -> CharTable {
        CharTable::from_entries([
            ('中', "zhong1,zhong4"),
            ('国', "guo2"),
            ('长', "zhang3,chang2"),
            ('江', "jiang1"),
            ('行', "xing2,hang2"),
            ('银', "yin2"),
        ])
    }

    fn phrases(entries: &[(&str, &[&str])]) -> Trie<Vec<String>> {
        let mut trie = Trie::new();
        for (word, readings) in entries {
            trie.insert(word, readings.iter().map(|r| r.to_string()).collect());
        }
        trie
    }

    #[test]
    fn test_falls_back_to_char_table() {
        let chars = table();
        let trie = phrases(&[]);
        let resolver = PinyinResolver::new(&trie, &chars);
        assert_eq!(resolver.resolve(&decode_str("中国")), vec!["zhong1", "guo2"]);
        assert_eq!(resolver.resolve(&decode_str("长江")), vec!["zhang3", "jiang1"]);
    }

    #[test]
    fn test_phrase_overrides_defaults() {
        let chars = table();
        let trie = phrases(&[("长江", &["chang2", "jiang1"]), ("银行", &["yin2", "hang2"])]);
        let resolver = PinyinResolver::new(&trie, &chars);
        assert_eq!(
            resolver.resolve(&decode_str("长江银行")),
            vec!["chang2", "jiang1", "yin2", "hang2"]
        );
        assert_eq!(resolver.resolve(&decode_str("行")), vec!["xing2"]);
    }

    #[test]
    fn test_length_matches_input_with_non_chinese() {
        let chars = table();
        let trie = phrases(&[]);
        let resolver = PinyinResolver::new(&trie, &chars);
        let runes = decode_str("中a国!");
        let out = resolver.resolve(&runes);
        assert_eq!(out.len(), runes.len());
        assert_eq!(out, vec!["zhong1", "", "guo2", ""]);
        assert!(resolver.resolve(&[]).is_empty());
    }

    #[test]
    fn test_short_payload_leaves_tail_to_char_table() {
        let chars = table();
        let trie = phrases(&[("中国", &["zhong4"])]);
        let resolver = PinyinResolver::new(&trie, &chars);
        assert_eq!(resolver.resolve(&decode_str("中国")), vec!["zhong4", "guo2"]);
    }
}
