//! Segmentation of romanized runs such as `woshiliang` into syllables.
//!
//! A run is lowercased and cut into letter and non-letter spans. Non-letter
//! spans (digits, punctuation) pass through whole. Letter spans are matched
//! against a [`SyllableDict`] both forwards and backwards with a bounded
//! window, and the segmentation with fewer pieces wins.

use crate::syllables::SyllableDict;

/// Longest syllable tried at each step.
pub const MAX_SYLLABLE_LEN: usize = 6;

#[derive(Debug, Clone, Copy)]
pub struct LatinSegmenter<'a> {
    dict: &'a SyllableDict,
    max_len: usize,
}

impl<'a> LatinSegmenter<'a> {
    pub fn new(dict: &'a SyllableDict) -> Self {
        Self {
            dict,
            max_len: MAX_SYLLABLE_LEN,
        }
    }

    /// Split `run` into syllables and pass-through pieces.
    ///
    /// ```
    /// use pinyin_analysis::{LatinSegmenter, SyllableDict};
    ///
    /// let dict = SyllableDict::builtin();
    /// let seg = LatinSegmenter::new(&dict);
    /// assert_eq!(seg.segment("WoShiLiang"), vec!["wo", "shi", "liang"]);
    /// assert_eq!(seg.segment("5zhong89"), vec!["5", "zhong", "89"]);
    /// ```
    pub fn segment(&self, run: &str) -> Vec<String> {
        let lower = run.to_ascii_lowercase();
        let mut out = Vec::new();
        for span in split_by_non_letter(&lower) {
            if !span.starts_with(|c: char| c.is_ascii_alphabetic()) || span.len() <= 1 {
                out.push(span.to_string());
                continue;
            }
            let forward = self.forward_max_match(span);
            if forward.len() == 1 {
                out.extend(forward);
                continue;
            }
            let backward = self.backward_max_match(span);
            if backward.len() < forward.len() {
                out.extend(backward);
            } else {
                out.extend(forward);
            }
        }
        out
    }

    /// Greedy longest-prefix matching from the left. Letters no syllable
    /// starts with gather into one piece, emitted before the next match.
    fn forward_max_match(&self, letters: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut unmatched = String::new();
        let mut start = 0;

        while start < letters.len() {
            let window = &letters[start..(start + self.max_len).min(letters.len())];
            let hit = (1..=window.len())
                .rev()
                .map(|n| &window[..n])
                .find(|guess| self.dict.contains(guess));

            match hit {
                Some(guess) => {
                    if !unmatched.is_empty() {
                        pieces.push(std::mem::take(&mut unmatched));
                    }
                    pieces.push(guess.to_string());
                    start += guess.len();
                }
                None => {
                    unmatched.push_str(&window[..1]);
                    start += 1;
                }
            }
        }
        if !unmatched.is_empty() {
            pieces.push(unmatched);
        }
        pieces
    }

    /// Greedy longest-suffix matching from the right, returned in
    /// left-to-right order.
    fn backward_max_match(&self, letters: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut unmatched = String::new();
        let mut end = letters.len();

        while end > 0 {
            let window = &letters[end.saturating_sub(self.max_len)..end];
            let hit = (0..window.len())
                .map(|skip| &window[skip..])
                .find(|guess| self.dict.contains(guess));

            match hit {
                Some(guess) => {
                    if !unmatched.is_empty() {
                        pieces.push(std::mem::take(&mut unmatched));
                    }
                    pieces.push(guess.to_string());
                    end -= guess.len();
                }
                None => {
                    unmatched.insert_str(0, &window[window.len() - 1..]);
                    end -= 1;
                }
            }
        }
        if !unmatched.is_empty() {
            pieces.push(unmatched);
        }
        pieces.reverse();
        pieces
    }
}

/// Cut `text` into maximal spans of ASCII letters and of everything else.
pub fn split_by_non_letter(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut span_start = 0;
    let mut in_letters: Option<bool> = None;

    for (i, c) in text.char_indices() {
        let is_letter = c.is_ascii_alphabetic();
        if in_letters.is_some_and(|prev| prev != is_letter) {
            spans.push(&text[span_start..i]);
            span_start = i;
        }
        in_letters = Some(is_letter);
    }
    if span_start < text.len() {
        spans.push(&text[span_start..]);
    }
    spans
}
