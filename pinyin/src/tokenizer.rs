//! Candidate assembly for one field of text.
//!
//! The whole input is decoded and resolved up front. A single pass then
//! walks the runes: Chinese characters contribute per-character readings,
//! ASCII letters and digits are gathered into Latin runs, and everything
//! feeds the joined first-letter / full-pinyin accumulators. The resulting
//! candidates are deduplicated and sorted before the first token is pulled.

use std::sync::Arc;

use pinyin_analysis_core::{decode, Candidate, CandidateSet, Rune, TokenStream};

use crate::alphabet::LatinSegmenter;
use crate::config::TokenizerConfig;
use crate::dictionary::Dictionaries;
use crate::error::ConfigError;
use crate::format::PinyinFormat;

/// Turns text into pinyin tokens according to a [`TokenizerConfig`].
///
/// Cheap to clone and safe to share across threads; every call to
/// [`PinyinTokenizer::tokenize`] gets its own working state.
///
/// ```
/// use std::sync::Arc;
/// use pinyin_analysis::{
///     CharTable, Dictionaries, PhraseTrie, PinyinTokenizer, SyllableDict, TokenizerConfig,
/// };
///
/// let chars = CharTable::from_entries([('刘', "liu2"), ('德', "de2"), ('华', "hua2")]);
/// let dicts = Arc::new(Dictionaries::new(PhraseTrie::new(), chars, SyllableDict::builtin()));
/// let tokenizer = PinyinTokenizer::new(dicts, TokenizerConfig::default()).unwrap();
///
/// let terms: Vec<String> = tokenizer.tokenize("刘德华").map(|t| t.term).collect();
/// assert_eq!(terms, vec!["de", "hua", "ldh", "liu"]);
/// ```
#[derive(Debug, Clone)]
pub struct PinyinTokenizer {
    dicts: Arc<Dictionaries>,
    config: TokenizerConfig,
    format: PinyinFormat,
}

impl PinyinTokenizer {
    /// Fails when `config` keeps no reading-producing output.
    pub fn new(dicts: Arc<Dictionaries>, config: TokenizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            dicts,
            config,
            format: PinyinFormat::toneless(),
        })
    }

    /// Representation used for full-pinyin terms. Toneless by default.
    pub fn with_format(mut self, format: PinyinFormat) -> Self {
        self.format = format;
        self
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    pub fn format(&self) -> &PinyinFormat {
        &self.format
    }

    pub fn dictionaries(&self) -> &Arc<Dictionaries> {
        &self.dicts
    }

    pub fn tokenize(&self, text: &str) -> TokenStream {
        self.tokenize_bytes(text.as_bytes())
    }

    /// Tokenize raw field bytes; invalid UTF-8 is replaced, not rejected.
    pub fn tokenize_bytes(&self, bytes: &[u8]) -> TokenStream {
        TokenStream::new(self.candidates(bytes), !self.config.ignore_offset_tracking)
    }

    /// Deduplicated candidates in output order.
    pub fn candidates(&self, bytes: &[u8]) -> Vec<Candidate> {
        let runes = decode(bytes);
        let readings = self.dicts.resolve(&runes);
        let mut assembly = Assembly::new(
            &self.config,
            LatinSegmenter::new(self.dicts.syllables()),
        );

        for (rune, raw) in runes.iter().zip(&readings) {
            if rune.ch.is_ascii() {
                if rune.ch.is_ascii_alphanumeric() {
                    assembly.latin(rune);
                } else {
                    assembly.flush_run();
                }
                continue;
            }
            assembly.flush_run();
            if !raw.is_empty() {
                assembly.chinese(rune, raw, &self.format.format(raw));
            }
        }
        assembly.finish(&String::from_utf8_lossy(bytes), bytes.len())
    }
}

#[derive(Debug)]
struct LatinRun {
    start: usize,
    end: usize,
    text: String,
}

/// Working state for one input.
struct Assembly<'a> {
    config: &'a TokenizerConfig,
    segmenter: LatinSegmenter<'a>,
    candidates: CandidateSet,
    position: usize,
    first_letters: String,
    joined_full_pinyin: String,
    run: Option<LatinRun>,
}

impl<'a> Assembly<'a> {
    fn new(config: &'a TokenizerConfig, segmenter: LatinSegmenter<'a>) -> Self {
        Self {
            config,
            segmenter,
            candidates: CandidateSet::new(config.remove_duplicate_term),
            position: 0,
            first_letters: String::new(),
            joined_full_pinyin: String::new(),
            run: None,
        }
    }

    fn next_position(&mut self) -> usize {
        self.position += 1;
        self.position
    }

    fn add(&mut self, term: &str, start: usize, end: usize, position: usize) {
        let term = if self.config.trim_whitespace {
            term.trim()
        } else {
            term
        };
        let mut term = if self.config.lowercase {
            term.to_lowercase()
        } else {
            term.to_string()
        };
        if self.config.max_token_length > 0 {
            if let Some((cut, _)) = term.char_indices().nth(self.config.max_token_length) {
                term.truncate(cut);
            }
        }
        self.candidates
            .push(Candidate::new(term, start, end, position));
    }

    /// `raw` is the dictionary reading, `reading` its formatted form. First
    /// letters always come from the raw reading without its tone digit.
    fn chinese(&mut self, rune: &Rune, raw: &str, reading: &str) {
        let bare = raw.trim_end_matches(|c: char| matches!(c, '1'..='5'));
        let Some(first) = bare.chars().next() else {
            return;
        };
        self.first_letters.push(first);

        let mut position = None;
        if self.config.keep_separate_first_letter && bare.chars().count() > 1 {
            let pos = self.next_position();
            position = Some(pos);
            self.add(&first.to_string(), rune.byte_start, rune.byte_end, pos);
        }
        if self.config.keep_full_pinyin {
            let pos = match position {
                Some(pos) => pos,
                None => self.next_position(),
            };
            position = Some(pos);
            self.add(reading, rune.byte_start, rune.byte_end, pos);
        }
        if self.config.keep_separate_chinese {
            let pos = match position {
                Some(pos) => pos,
                None => self.next_position(),
            };
            self.add(&rune.ch.to_string(), rune.byte_start, rune.byte_end, pos);
        }
        if self.config.keep_joined_full_pinyin {
            self.joined_full_pinyin.push_str(reading);
        }
    }

    fn latin(&mut self, rune: &Rune) {
        let ch = rune.ch;
        if self.config.keep_none_chinese {
            if self.config.keep_none_chinese_together {
                let run = self.run.get_or_insert_with(|| LatinRun {
                    start: rune.byte_start,
                    end: rune.byte_start,
                    text: String::new(),
                });
                run.end = rune.byte_end;
                run.text.push(ch);
            } else {
                let pos = self.next_position();
                self.add(&ch.to_string(), rune.byte_start, rune.byte_end, pos);
            }
        }
        if self.config.keep_none_chinese_in_first_letter {
            self.first_letters.push(ch);
        }
        if self.config.keep_none_chinese_in_joined_full_pinyin {
            self.joined_full_pinyin.push(ch);
        }
    }

    fn flush_run(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };
        let config = self.config;
        if config.none_chinese_pinyin_tokenize {
            let mut start = run.start;
            for piece in self.segmenter.segment(&run.text) {
                let end = if config.fixed_pinyin_offset {
                    start + 1
                } else {
                    start + piece.len()
                };
                let pos = self.next_position();
                self.add(&piece, start, end, pos);
                start = end;
            }
        } else if config.keep_first_letter
            || config.keep_separate_first_letter
            || config.keep_full_pinyin
            || !config.keep_none_chinese_in_joined_full_pinyin
        {
            let pos = self.next_position();
            self.add(&run.text, run.start, run.end, pos);
        }
    }

    fn finish(mut self, source: &str, source_len: usize) -> Vec<Candidate> {
        self.flush_run();
        let config = self.config;

        if config.keep_original {
            self.add(source, 0, source_len, 1);
        }

        if config.keep_joined_full_pinyin && !self.joined_full_pinyin.is_empty() {
            let joined = std::mem::take(&mut self.joined_full_pinyin);
            self.add(&joined, 0, source_len, 1);
        }

        if config.keep_first_letter && !self.first_letters.is_empty() {
            let mut letters = std::mem::take(&mut self.first_letters);
            if config.limit_first_letter_length > 0 {
                if let Some((cut, _)) = letters.char_indices().nth(config.limit_first_letter_length) {
                    letters.truncate(cut);
                }
            }
            if config.lowercase {
                letters = letters.to_lowercase();
            }
            // a lone letter already went out as a separate first letter
            if !(config.keep_separate_first_letter && letters.chars().count() <= 1) {
                self.add(&letters, 0, source_len, 1);
            }
        }

        self.candidates.into_sorted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::char_table::CharTable;
    use crate::syllables::SyllableDict;
    use pinyin_analysis_core::Trie;

    fn dicts() -> Arc<Dictionaries> {
        let chars = CharTable::from_entries([
            ('刘', "liu2"),
            ('德', "de2"),
            ('华', "hua2"),
            ('中', "zhong1,zhong4"),
            ('国', "guo2"),
            ('人', "ren2"),
            ('安', "an1"),
            ('爱', "ai4"),
        ]);
        Arc::new(Dictionaries::new(Trie::new(), chars, SyllableDict::builtin()))
    }

    fn tokenizer(config: TokenizerConfig) -> PinyinTokenizer {
        PinyinTokenizer::new(dicts(), config).unwrap()
    }

    fn terms(tokenizer: &PinyinTokenizer, text: &str) -> Vec<String> {
        tokenizer.tokenize(text).map(|t| t.term).collect()
    }

    fn positions(tokenizer: &PinyinTokenizer, text: &str) -> Vec<(String, usize)> {
        tokenizer
            .candidates(text.as_bytes())
            .into_iter()
            .map(|c| (c.term, c.position))
            .collect()
    }

    #[test]
    fn test_rejects_config_without_readings() {
        let config = TokenizerConfig {
            keep_first_letter: false,
            keep_full_pinyin: false,
            ..TokenizerConfig::default()
        };
        assert!(matches!(
            PinyinTokenizer::new(dicts(), config),
            Err(ConfigError::NoReadingRetained)
        ));
    }

    #[test]
    fn test_default_chinese_output() {
        let t = tokenizer(TokenizerConfig::default());
        assert_eq!(
            positions(&t, "刘德华"),
            vec![
                ("de".to_string(), 2),
                ("hua".to_string(), 3),
                ("ldh".to_string(), 1),
                ("liu".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_separate_first_letter_shares_position_with_full_pinyin() {
        let t = tokenizer(TokenizerConfig {
            keep_separate_first_letter: true,
            keep_first_letter: false,
            ..TokenizerConfig::default()
        });
        assert_eq!(
            positions(&t, "刘德"),
            vec![
                ("d".to_string(), 2),
                ("de".to_string(), 2),
                ("l".to_string(), 1),
                ("liu".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_single_first_letter_suppressed_in_separate_mode() {
        let t = tokenizer(TokenizerConfig {
            keep_separate_first_letter: true,
            keep_full_pinyin: false,
            ..TokenizerConfig::default()
        });
        assert_eq!(terms(&t, "刘"), vec!["l"]);
        assert_eq!(terms(&t, "刘德"), vec!["d", "l", "ld"]);
    }

    #[test]
    fn test_latin_run_segmented_with_offsets() {
        let t = tokenizer(TokenizerConfig {
            keep_first_letter: false,
            ignore_offset_tracking: false,
            ..TokenizerConfig::default()
        });
        let tokens: Vec<(String, usize, usize)> = t
            .tokenize("liudehua")
            .map(|t| (t.term, t.start_offset, t.end_offset))
            .collect();
        assert_eq!(
            tokens,
            vec![
                ("de".to_string(), 3, 5),
                ("hua".to_string(), 5, 8),
                ("liu".to_string(), 0, 3),
            ]
        );
    }

    #[test]
    fn test_fixed_pinyin_offset() {
        let t = tokenizer(TokenizerConfig {
            keep_first_letter: false,
            fixed_pinyin_offset: true,
            ..TokenizerConfig::default()
        });
        let offsets: Vec<(String, usize, usize)> = t
            .candidates("a liudehua".as_bytes())
            .into_iter()
            .map(|c| (c.term, c.start_offset, c.end_offset))
            .collect();
        assert_eq!(
            offsets,
            vec![
                ("a".to_string(), 0, 1),
                ("de".to_string(), 3, 4),
                ("hua".to_string(), 4, 5),
                ("liu".to_string(), 2, 3),
            ]
        );
    }

    #[test]
    fn test_latin_run_kept_whole_without_pinyin_tokenize() {
        let t = tokenizer(TokenizerConfig {
            none_chinese_pinyin_tokenize: false,
            keep_first_letter: false,
            ..TokenizerConfig::default()
        });
        assert_eq!(terms(&t, "DJ刘"), vec!["dj", "liu"]);
    }

    #[test]
    fn test_latin_characters_split_when_not_together() {
        let t = tokenizer(TokenizerConfig {
            keep_none_chinese_together: false,
            keep_first_letter: false,
            ..TokenizerConfig::default()
        });
        assert_eq!(
            positions(&t, "DJ刘"),
            vec![
                ("d".to_string(), 1),
                ("j".to_string(), 2),
                ("liu".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_joined_outputs_include_latin_when_asked() {
        let t = tokenizer(TokenizerConfig {
            keep_joined_full_pinyin: true,
            keep_none_chinese_in_joined_full_pinyin: true,
            keep_full_pinyin: false,
            keep_none_chinese: false,
            ..TokenizerConfig::default()
        });
        assert_eq!(terms(&t, "刘德华2"), vec!["ldh2", "liudehua2"]);
    }

    #[test]
    fn test_first_letter_limit_and_original() {
        let t = tokenizer(TokenizerConfig {
            keep_full_pinyin: false,
            keep_original: true,
            limit_first_letter_length: 2,
            ..TokenizerConfig::default()
        });
        assert_eq!(terms(&t, "刘德华"), vec!["ld", "刘德华"]);
    }

    #[test]
    fn test_separate_chinese_and_unknown_characters() {
        let t = tokenizer(TokenizerConfig {
            keep_separate_chinese: true,
            keep_first_letter: false,
            ..TokenizerConfig::default()
        });
        // 。has no reading and only ends the latin run
        assert_eq!(
            positions(&t, "ai。中"),
            vec![
                ("ai".to_string(), 1),
                ("zhong".to_string(), 2),
                ("中".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_duplicate_terms() {
        let keep = tokenizer(TokenizerConfig {
            keep_first_letter: false,
            ..TokenizerConfig::default()
        });
        assert_eq!(terms(&keep, "刘刘"), vec!["liu", "liu"]);

        let dedup = tokenizer(TokenizerConfig {
            keep_first_letter: false,
            remove_duplicate_term: true,
            ..TokenizerConfig::default()
        });
        assert_eq!(terms(&dedup, "刘刘"), vec!["liu"]);
    }

    #[test]
    fn test_tone_format_for_full_pinyin() {
        let t = tokenizer(TokenizerConfig {
            keep_first_letter: false,
            ..TokenizerConfig::default()
        })
        .with_format(PinyinFormat::unicode());
        assert_eq!(terms(&t, "中国"), vec!["guó", "zhōng"]);
    }

    #[test]
    fn test_first_letters_ignore_tone_marks() {
        let t = tokenizer(TokenizerConfig::default()).with_format(PinyinFormat::unicode());
        assert_eq!(terms(&t, "安爱"), vec!["aa", "ài", "ān"]);
    }

    #[test]
    fn test_separate_first_letter_under_abbr_format() {
        let t = tokenizer(TokenizerConfig {
            keep_first_letter: false,
            keep_full_pinyin: false,
            keep_separate_first_letter: true,
            ..TokenizerConfig::default()
        })
        .with_format(PinyinFormat::abbr());
        assert_eq!(terms(&t, "刘德"), vec!["d", "l"]);

        let joined = tokenizer(TokenizerConfig::default()).with_format(PinyinFormat::abbr());
        assert_eq!(terms(&joined, "刘德华"), vec!["d", "h", "l", "ldh"]);
    }

    #[test]
    fn test_joined_first_letters_span_whole_input() {
        let t = tokenizer(TokenizerConfig {
            keep_full_pinyin: false,
            ignore_offset_tracking: false,
            ..TokenizerConfig::default()
        });
        let spans: Vec<(String, usize, usize)> = t
            .tokenize("刘德华")
            .map(|t| (t.term, t.start_offset, t.end_offset))
            .collect();
        assert_eq!(spans, vec![("ldh".to_string(), 0, 9)]);
    }

    #[test]
    fn test_invalid_bytes_do_not_abort() {
        let t = tokenizer(TokenizerConfig::default());
        let mut bytes = "刘".as_bytes().to_vec();
        bytes.push(0xff);
        bytes.extend_from_slice("德".as_bytes());
        let out: Vec<String> = t.tokenize_bytes(&bytes).map(|t| t.term).collect();
        assert_eq!(out, vec!["de", "ld", "liu"]);
    }

    #[test]
    fn test_max_token_length_truncates() {
        let t = tokenizer(TokenizerConfig {
            keep_first_letter: false,
            none_chinese_pinyin_tokenize: false,
            max_token_length: 4,
            ..TokenizerConfig::default()
        });
        assert_eq!(terms(&t, "abcdefgh"), vec!["abcd"]);
    }

    #[test]
    fn test_empty_input() {
        let t = tokenizer(TokenizerConfig {
            keep_original: true,
            ..TokenizerConfig::default()
        });
        assert!(t.tokenize("").next().is_none());
    }
}
