//! pinyin-analysis crate root
//!
//! Pinyin transliteration for search indexing: polyphone-aware reading
//! resolution, tone formatting, Latin-run segmentation and the tokenizer
//! that assembles index terms from them.
//!
//! Public API exported here:
//! - `Dictionaries` from `dictionary` (shared tables, conversion helpers)
//! - `PinyinTokenizer` from `tokenizer` and `TokenizerConfig` from `config`
//! - `PinyinFormat` and its enums from `format`
//! - `CharTable`, `SyllableDict`, `LatinSegmenter`, `PinyinResolver`

pub mod alphabet;
pub mod char_table;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod format;
pub mod formatter;
pub mod resolver;
pub mod syllables;
pub mod tokenizer;

// Convenience re-exports for common types used by callers.
pub use alphabet::LatinSegmenter;
pub use char_table::CharTable;
pub use config::TokenizerConfig;
pub use dictionary::{Dictionaries, PhraseTrie};
pub use error::ConfigError;
pub use format::{list_to_string, list_to_string_skip_null, CaseType, PinyinFormat, ToneType, YuCharType};
pub use resolver::PinyinResolver;
pub use syllables::{SyllableDict, PINYIN_SYLLABLES};
pub use tokenizer::PinyinTokenizer;

pub use pinyin_analysis_core::{Candidate, DictionaryError, Token, TokenStream};
