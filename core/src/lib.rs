//! pinyin-analysis-core
//!
//! Language-agnostic pieces of the pinyin analysis pipeline, shared by the
//! `pinyin-analysis` crate.
//!
//! Public API:
//! - `decode` / `Rune` - UTF-8 decoding with byte offsets, lossy on bad input
//! - `Trie` - Codepoint-keyed phrase trie with status merging
//! - `PhraseMatcher` - Longest non-overlapping phrase matches over runes
//! - `Candidate` / `CandidateSet` - Deduplicated, deterministically ordered terms
//! - `Token` / `TokenStream` - Emitted tokens with position increments
//! - `DictionaryError` - I/O and snapshot failures

pub mod rune;
pub use rune::{decode, decode_str, Rune};

pub mod trie;
pub use trie::{NodeId, NodeStatus, Trie};

pub mod matcher;
pub use matcher::{PhraseMatch, PhraseMatcher};

pub mod candidate;
pub use candidate::{Candidate, CandidateSet, Token, TokenStream};

pub mod errors;
pub use errors::DictionaryError;
