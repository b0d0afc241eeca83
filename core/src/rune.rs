//! UTF-8 decoding with byte-offset tracking.
//!
//! Every downstream stage (phrase matching, reading resolution, token
//! assembly) works on runes rather than on `char`s so that byte offsets of
//! the original field survive all the way to the emitted tokens.

use serde::{Deserialize, Serialize};

/// A decoded codepoint plus the `[byte_start, byte_end)` range it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rune {
    pub ch: char,
    pub byte_start: usize,
    pub byte_end: usize,
}

impl Rune {
    pub fn new(ch: char, byte_start: usize, byte_end: usize) -> Self {
        Self {
            ch,
            byte_start,
            byte_end,
        }
    }

    /// Number of source bytes this rune occupies.
    pub fn byte_len(&self) -> usize {
        self.byte_end - self.byte_start
    }

    /// True when the rune was substituted for an undecodable byte sequence
    /// (or was a literal U+FFFD in the input).
    pub fn is_replacement(&self) -> bool {
        self.ch == char::REPLACEMENT_CHARACTER
    }
}

/// Decode `bytes` into runes.
///
/// Each maximal invalid subsequence becomes a single U+FFFD rune spanning the
/// offending bytes, so the output is never empty for non-empty input and the
/// byte ranges always tile the whole input.
///
/// # Example
/// ```
/// use pinyin_analysis_core::rune::decode;
///
/// let runes = decode("a中".as_bytes());
/// assert_eq!(runes.len(), 2);
/// assert_eq!((runes[1].byte_start, runes[1].byte_end), (1, 4));
///
/// let broken = decode(&[b'x', 0xff, b'y']);
/// assert_eq!(broken[1].ch, '\u{FFFD}');
/// ```
pub fn decode(bytes: &[u8]) -> Vec<Rune> {
    let mut runes = Vec::with_capacity(bytes.len());
    let mut offset = 0;

    for chunk in bytes.utf8_chunks() {
        for (i, ch) in chunk.valid().char_indices() {
            let start = offset + i;
            runes.push(Rune::new(ch, start, start + ch.len_utf8()));
        }
        offset += chunk.valid().len();

        let invalid = chunk.invalid();
        if !invalid.is_empty() {
            runes.push(Rune::new(
                char::REPLACEMENT_CHARACTER,
                offset,
                offset + invalid.len(),
            ));
            offset += invalid.len();
        }
    }

    runes
}

/// Decode already-validated text. Byte ranges index into `text`.
pub fn decode_str(text: &str) -> Vec<Rune> {
    text.char_indices()
        .map(|(i, ch)| Rune::new(ch, i, i + ch.len_utf8()))
        .collect()
}

/// Re-encode runes as UTF-8. For valid input this reproduces the source bytes.
pub fn encode(runes: &[Rune]) -> String {
    runes.iter().map(|r| r.ch).collect()
}
