//! Codepoint-keyed prefix trie mapping phrases to payloads.
//!
//! Nodes live in a single arena and are addressed by [`NodeId`], so a handle
//! returned from [`Trie::lookup_child`] is a plain index that stays valid for
//! as long as the trie does (nodes are never freed, only degraded).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::matcher::PhraseMatcher;
use crate::rune::Rune;

type Children = HashMap<char, NodeId, ahash::RandomState>;

/// Handle to a node inside a [`Trie`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Match status of a trie node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
    /// Prefix of some phrase, not a phrase itself.
    Continue,
    /// A complete phrase that is also the prefix of a longer one.
    WordContinue,
    /// A complete phrase with no continuation.
    WordEnd,
}

impl NodeStatus {
    pub fn is_complete(self) -> bool {
        matches!(self, NodeStatus::WordContinue | NodeStatus::WordEnd)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Node<P> {
    ch: char,
    status: NodeStatus,
    children: Children,
    payload: P,
}

impl<P> Node<P> {
    fn new(ch: char, status: NodeStatus, payload: P) -> Self {
        Self {
            ch,
            status,
            children: Children::default(),
            payload,
        }
    }
}

/// Prefix trie over `char`s with a payload on every complete phrase.
///
/// Overlapping insertions merge node status so that the final shape does not
/// depend on insertion order: a phrase that is also a prefix of a longer one
/// ends up [`NodeStatus::WordContinue`]. Re-inserting an existing phrase
/// overwrites its payload.
///
/// # Example
/// ```
/// use pinyin_analysis_core::trie::{NodeStatus, Trie};
///
/// let mut trie: Trie<Vec<String>> = Trie::new();
/// trie.insert("中国", vec!["zhong1".into(), "guo2".into()]);
/// trie.insert("中国人", vec!["zhong1".into(), "guo2".into(), "ren2".into()]);
///
/// let node = trie.find("中国").unwrap();
/// assert_eq!(trie.status(node), NodeStatus::WordContinue);
/// assert_eq!(trie.get("中国人").map(Vec::len), Some(3));
/// assert!(!trie.contains("中"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trie<P> {
    nodes: Vec<Node<P>>,
}

impl<P: Default> Default for Trie<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Default> Trie<P> {
    /// Create an empty trie holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new('\0', NodeStatus::Continue, P::default())],
        }
    }

    /// Insert `phrase` with `payload`. Empty phrases are ignored.
    pub fn insert(&mut self, phrase: &str, payload: P) {
        let chars: Vec<char> = phrase.chars().collect();
        self.insert_chars(&chars, payload);
    }

    /// Insert a phrase given as codepoints.
    ///
    /// Intermediate codepoints are added as `Continue` steps with an empty
    /// payload, the last one as a word end carrying `payload`.
    pub fn insert_chars(&mut self, phrase: &[char], payload: P) {
        let Some((&last, prefix)) = phrase.split_last() else {
            return;
        };
        let mut node = self.root();
        for &ch in prefix {
            node = self.add_child(node, ch, NodeStatus::Continue, P::default());
        }
        self.add_child(node, last, NodeStatus::WordEnd, payload);
    }

    fn add_child(&mut self, parent: NodeId, ch: char, status: NodeStatus, payload: P) -> NodeId {
        if let Some(id) = self.lookup_child(parent, ch) {
            let node = &mut self.nodes[id.index()];
            match status {
                NodeStatus::Continue => {
                    if node.status == NodeStatus::WordEnd {
                        node.status = NodeStatus::WordContinue;
                    }
                }
                NodeStatus::WordContinue | NodeStatus::WordEnd => {
                    if node.status != NodeStatus::WordEnd {
                        node.status = NodeStatus::WordContinue;
                    }
                    node.payload = payload;
                }
            }
            return id;
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(ch, status, payload));
        self.nodes[parent.index()].children.insert(ch, id);
        id
    }

    /// Degrade `phrase` back to a plain prefix. Longer phrases running
    /// through it are kept. Returns whether a complete phrase was removed.
    pub fn remove(&mut self, phrase: &str) -> bool {
        let Some(id) = self.find(phrase) else {
            return false;
        };
        if id == self.root() {
            return false;
        }
        let node = &mut self.nodes[id.index()];
        let was_complete = node.status.is_complete();
        node.status = NodeStatus::Continue;
        node.payload = P::default();
        was_complete
    }
}

impl<P> Trie<P> {
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Follow the edge labelled `ch` out of `node`.
    pub fn lookup_child(&self, node: NodeId, ch: char) -> Option<NodeId> {
        self.nodes
            .get(node.index())
            .and_then(|n| n.children.get(&ch))
            .copied()
    }

    /// # Panics
    ///
    /// A [`NodeId`] is only valid for the trie that issued it. Handles from
    /// another trie may panic here and in [`Trie::payload`].
    pub fn status(&self, node: NodeId) -> NodeStatus {
        self.nodes[node.index()].status
    }

    pub fn is_complete(&self, node: NodeId) -> bool {
        self.status(node).is_complete()
    }

    pub fn payload(&self, node: NodeId) -> &P {
        &self.nodes[node.index()].payload
    }

    /// Branch reached by walking `phrase` from the root, complete or not.
    pub fn find(&self, phrase: &str) -> Option<NodeId> {
        phrase
            .chars()
            .try_fold(self.root(), |node, ch| self.lookup_child(node, ch))
    }

    /// Payload of `phrase` if it is a complete phrase.
    pub fn get(&self, phrase: &str) -> Option<&P> {
        self.find(phrase)
            .filter(|&id| self.is_complete(id))
            .map(|id| self.payload(id))
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.get(phrase).is_some()
    }

    /// Number of complete phrases.
    pub fn len(&self) -> usize {
        self.nodes
            .iter()
            .skip(1)
            .filter(|n| n.status.is_complete())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scanner yielding the longest non-overlapping phrases found in `runes`.
    pub fn matcher<'a>(&'a self, runes: &'a [Rune]) -> PhraseMatcher<'a, P> {
        PhraseMatcher::new(self, runes)
    }
}

impl<P: Clone> Trie<P> {
    /// All complete phrases with their payloads, ordered by phrase.
    pub fn entries(&self) -> BTreeMap<String, P> {
        let mut out = BTreeMap::new();
        let mut stack = vec![(self.root(), String::new())];
        while let Some((id, prefix)) = stack.pop() {
            for (&ch, &child) in &self.nodes[id.index()].children {
                let mut phrase = prefix.clone();
                phrase.push(ch);
                let node = &self.nodes[child.index()];
                debug_assert_eq!(node.ch, ch);
                if node.status.is_complete() {
                    out.insert(phrase.clone(), node.payload.clone());
                }
                stack.push((child, phrase));
            }
        }
        out
    }
}
