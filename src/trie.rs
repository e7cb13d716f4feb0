// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

/// Prefix tree over `char` keys, mapping complete keys to values.
///
/// Children are kept in character order, so [Trie::keys_with_prefix]
/// enumerates keys lexicographically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trie<V> {
    root: TrieNode<V>,
    len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TrieNode<V> {
    /// Present only if the path to this node is a complete key.
    value: Option<V>,
    children: BTreeMap<char, TrieNode<V>>,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self {
            root: TrieNode::default(),
            len: 0,
        }
    }
}

impl<V> Default for TrieNode<V> {
    fn default() -> Self {
        Self {
            value: None,
            children: BTreeMap::default(),
        }
    }
}

impl<V> Trie<V> {
    /// Creates an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of complete keys stored in the trie.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let node = key
            .chars()
            .fold(&mut self.root, |node, c| node.children.entry(c).or_default());

        let previous = node.value.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Retrieves the value stored under exactly `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.find(key).and_then(|node| node.value.as_ref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns all complete keys starting with `prefix`, in lexicographic order.
    /// An empty prefix enumerates every key.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys = Vec::new();
        if let Some(node) = self.find(prefix) {
            let mut buffer = String::from(prefix);
            node.collect_keys(&mut buffer, &mut keys);
        }
        keys
    }

    fn find(&self, key: &str) -> Option<&TrieNode<V>> {
        key.chars()
            .try_fold(&self.root, |node, c| node.children.get(&c))
    }
}

impl<V> TrieNode<V> {
    /// Depth-first walk appending every complete key below (and including) this node.
    fn collect_keys(&self, buffer: &mut String, keys: &mut Vec<String>) {
        if self.value.is_some() {
            keys.push(buffer.clone());
        }

        for (&c, child) in &self.children {
            buffer.push(c);
            child.collect_keys(buffer, keys);
            buffer.pop();
        }
    }
}
