//! Candidate and token types for analysis output.
//!
//! This module provides:
//! - `Candidate`: A term with byte offsets and a logical position, as built
//!   during assembly
//! - `CandidateSet`: Deduplicating collector that yields candidates in a
//!   deterministic order
//! - `Token`: The record handed to the indexer, carrying a position increment
//! - `TokenStream`: Pull iterator turning sorted candidates into tokens

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A term awaiting emission.
///
/// Field order matters: the derived `Ord` sorts by term, then start offset,
/// end offset and position, which is the output order of a [`CandidateSet`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub term: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub position: usize,
}

impl Candidate {
    pub fn new<T: Into<String>>(term: T, start_offset: usize, end_offset: usize, position: usize) -> Self {
        Candidate {
            term: term.into(),
            start_offset,
            end_offset,
            position,
        }
    }
}

/// Collects candidates, rejecting repeats.
///
/// With `dedup_by_term`, a term is kept once regardless of position;
/// otherwise the same term may appear once per position.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
    seen: HashSet<(String, Option<usize>)>,
    dedup_by_term: bool,
}

impl CandidateSet {
    pub fn new(dedup_by_term: bool) -> Self {
        Self {
            candidates: Vec::new(),
            seen: HashSet::new(),
            dedup_by_term,
        }
    }

    /// Add a candidate unless its dedup key was already seen. Empty terms are
    /// never stored. Returns whether the candidate was kept.
    pub fn push(&mut self, candidate: Candidate) -> bool {
        if candidate.term.is_empty() {
            return false;
        }
        let position = (!self.dedup_by_term).then_some(candidate.position);
        if !self.seen.insert((candidate.term.clone(), position)) {
            return false;
        }
        self.candidates.push(candidate);
        true
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Consume the set, returning candidates ordered by
    /// `(term, start_offset, end_offset, position)`.
    pub fn into_sorted(self) -> Vec<Candidate> {
        let mut candidates = self.candidates;
        candidates.sort();
        candidates
    }
}

/// One emitted token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub term: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub position_increment: usize,
}

/// Pull iterator over finalized candidates.
///
/// The position increment of each token is its candidate's position minus
/// the previous token's, clamped at zero.
#[derive(Debug, Clone)]
pub struct TokenStream {
    candidates: std::vec::IntoIter<Candidate>,
    last_position: usize,
    report_offsets: bool,
}

impl TokenStream {
    pub fn new(candidates: Vec<Candidate>, report_offsets: bool) -> Self {
        Self {
            candidates: candidates.into_iter(),
            last_position: 0,
            report_offsets,
        }
    }

    /// Tokens not yet pulled.
    pub fn remaining(&self) -> usize {
        self.candidates.len()
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let c = self.candidates.next()?;
        let position_increment = c.position.saturating_sub(self.last_position);
        self.last_position = c.position;
        let (start_offset, end_offset) = if self.report_offsets {
            (c.start_offset, c.end_offset)
        } else {
            (0, 0)
        };
        Some(Token {
            term: c.term,
            start_offset,
            end_offset,
            position_increment,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.candidates.size_hint()
    }
}

impl ExactSizeIterator for TokenStream {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_by_term_ignores_position() {
        let mut set = CandidateSet::new(true);
        assert!(set.push(Candidate::new("liu", 0, 3, 1)));
        assert!(!set.push(Candidate::new("liu", 3, 6, 2)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_dedup_by_term_and_position() {
        let mut set = CandidateSet::new(false);
        assert!(set.push(Candidate::new("liu", 0, 3, 1)));
        assert!(set.push(Candidate::new("liu", 3, 6, 2)));
        assert!(!set.push(Candidate::new("liu", 6, 9, 2)));
        assert!(!set.push(Candidate::new("", 0, 0, 3)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_sorted_by_term_then_offsets() {
        let mut set = CandidateSet::new(false);
        set.push(Candidate::new("hua", 6, 9, 3));
        set.push(Candidate::new("de", 3, 6, 2));
        set.push(Candidate::new("ldh", 0, 9, 1));
        set.push(Candidate::new("de", 0, 9, 1));
        let terms: Vec<(String, usize)> = set
            .into_sorted()
            .into_iter()
            .map(|c| (c.term, c.start_offset))
            .collect();
        assert_eq!(
            terms,
            vec![
                ("de".to_string(), 0),
                ("de".to_string(), 3),
                ("hua".to_string(), 6),
                ("ldh".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_position_increment_never_negative() {
        let stream = TokenStream::new(
            vec![
                Candidate::new("a", 0, 1, 2),
                Candidate::new("b", 1, 2, 1),
                Candidate::new("c", 2, 3, 4),
            ],
            true,
        );
        let incs: Vec<usize> = stream.map(|t| t.position_increment).collect();
        assert_eq!(incs, vec![2, 0, 3]);
    }

    #[test]
    fn test_offsets_suppressed() {
        let mut stream = TokenStream::new(vec![Candidate::new("zhong", 0, 3, 1)], false);
        assert_eq!(stream.remaining(), 1);
        let t = stream.next().unwrap();
        assert_eq!((t.start_offset, t.end_offset), (0, 0));
        assert!(stream.next().is_none());
    }
}
