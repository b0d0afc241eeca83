//! Forward maximum matching of trie phrases over a rune sequence.
//!
//! The scanner always prefers the longest phrase starting at the current
//! root. A phrase that is complete but could still be extended
//! (`WordContinue`) is only remembered; the scanner keeps walking and falls
//! back to the remembered hit once the walk dead-ends.
//!
//! On top of raw matching, a hit whose edge touches an ASCII letter or digit
//! of the same class is rejected, so that a dictionary entry such as
//! `"5zhong"` cannot carve a piece out of a longer alphanumeric token.

use crate::rune::Rune;
use crate::trie::{NodeId, NodeStatus, Trie};

/// One accepted phrase hit: runes `[start, end)` of the scanned sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch<'a, P> {
    pub text: String,
    pub payload: &'a P,
    pub start: usize,
    pub end: usize,
}

impl<P> PhraseMatch<'_, P> {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning {
        root: usize,
        cursor: usize,
        branch: NodeId,
    },
    PendingMatch {
        root: usize,
        end: usize,
        best: NodeId,
        cursor: usize,
        branch: NodeId,
    },
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AsciiClass {
    Letter,
    Digit,
}

fn ascii_class(ch: char) -> Option<AsciiClass> {
    if ch.is_ascii_alphabetic() {
        Some(AsciiClass::Letter)
    } else if ch.is_ascii_digit() {
        Some(AsciiClass::Digit)
    } else {
        None
    }
}

/// Iterator over the non-overlapping longest phrase matches in a rune slice.
///
/// Created per input by [`Trie::matcher`]; holds only cursors into the
/// borrowed trie and runes.
///
/// # Example
/// ```
/// use pinyin_analysis_core::rune::decode_str;
/// use pinyin_analysis_core::trie::Trie;
///
/// let mut trie: Trie<Vec<String>> = Trie::new();
/// trie.insert("中", vec!["zhong1".into()]);
/// trie.insert("中国", vec!["zhong1".into(), "guo2".into()]);
/// trie.insert("中国人", vec!["zhong1".into(), "guo2".into(), "ren2".into()]);
///
/// let runes = decode_str("中国人");
/// let hits: Vec<String> = trie.matcher(&runes).map(|m| m.text).collect();
/// assert_eq!(hits, vec!["中国人".to_string()]);
/// ```
#[derive(Debug)]
pub struct PhraseMatcher<'a, P> {
    trie: &'a Trie<P>,
    runes: &'a [Rune],
    state: ScanState,
}

impl<'a, P> PhraseMatcher<'a, P> {
    pub fn new(trie: &'a Trie<P>, runes: &'a [Rune]) -> Self {
        Self {
            trie,
            runes,
            state: ScanState::Scanning {
                root: 0,
                cursor: 0,
                branch: trie.root(),
            },
        }
    }

    fn restart_at(&mut self, root: usize) {
        self.state = ScanState::Scanning {
            root,
            cursor: root,
            branch: self.trie.root(),
        };
    }

    /// Next raw longest match, before the boundary rule is applied.
    fn next_raw(&mut self) -> Option<(usize, usize, NodeId)> {
        loop {
            let (root, cursor, branch, pending) = match self.state {
                ScanState::Exhausted => return None,
                ScanState::Scanning {
                    root,
                    cursor,
                    branch,
                } => (root, cursor, branch, None),
                ScanState::PendingMatch {
                    root,
                    end,
                    best,
                    cursor,
                    branch,
                } => (root, cursor, branch, Some((end, best))),
            };

            if root >= self.runes.len() {
                self.state = ScanState::Exhausted;
                return None;
            }

            let step = self
                .runes
                .get(cursor)
                .and_then(|r| self.trie.lookup_child(branch, r.ch));

            match step {
                Some(node) => {
                    let next = cursor + 1;
                    match self.trie.status(node) {
                        NodeStatus::WordEnd => {
                            self.restart_at(next);
                            return Some((root, next, node));
                        }
                        NodeStatus::WordContinue => {
                            self.state = ScanState::PendingMatch {
                                root,
                                end: next,
                                best: node,
                                cursor: next,
                                branch: node,
                            };
                        }
                        NodeStatus::Continue => {
                            self.state = match pending {
                                Some((end, best)) => ScanState::PendingMatch {
                                    root,
                                    end,
                                    best,
                                    cursor: next,
                                    branch: node,
                                },
                                None => ScanState::Scanning {
                                    root,
                                    cursor: next,
                                    branch: node,
                                },
                            };
                        }
                    }
                }
                None => match pending {
                    Some((end, best)) => {
                        if end <= root {
                            tracing::warn!(root, end, "phrase matcher stalled, ending scan");
                            debug_assert!(false, "phrase matcher stalled at rune {root}");
                            self.state = ScanState::Exhausted;
                            return None;
                        }
                        self.restart_at(end);
                        return Some((root, end, best));
                    }
                    None => self.restart_at(root + 1),
                },
            }
        }
    }

    fn breaks_alphanumeric_run(&self, start: usize, end: usize) -> bool {
        let touches = |outside: Option<&Rune>, edge: &Rune| match (outside, ascii_class(edge.ch)) {
            (Some(o), Some(class)) => ascii_class(o.ch) == Some(class),
            _ => false,
        };
        let before = start.checked_sub(1).and_then(|i| self.runes.get(i));
        let after = self.runes.get(end);
        touches(before, &self.runes[start]) || touches(after, &self.runes[end - 1])
    }
}

impl<'a, P> Iterator for PhraseMatcher<'a, P> {
    type Item = PhraseMatch<'a, P>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((start, end, node)) = self.next_raw() {
            if self.breaks_alphanumeric_run(start, end) {
                // resume one rune past the rejected hit's start
                self.restart_at(start + 1);
                continue;
            }
            return Some(PhraseMatch {
                text: self.runes[start..end].iter().map(|r| r.ch).collect(),
                payload: self.trie.payload(node),
                start,
                end,
            });
        }
        None
    }
}
