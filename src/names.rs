// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::Trie;

/// Converts a place name into its searchable form: every character outside
/// `[A-Za-z ]` is dropped and the rest is lowercased.
///
/// ```
/// assert_eq!(waymark::normalize_name("McDonald's #12"), "mcdonalds ");
/// ```
pub fn normalize_name(raw: &str) -> String {
    raw.chars()
        .filter(|&c| c.is_ascii_alphabetic() || c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Index of place names, keyed by their [normalized](normalize_name) form.
///
/// Every key remembers all vertex ids registered under it, in registration order.
/// The trie additionally keeps a single representative id per key, replaced
/// on every registration. Lookups and prefix searches go through the id lists;
/// the representative is only exposed through [NameIndex::representative].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NameIndex {
    ids: HashMap<String, Vec<i64>>,
    trie: Trie<i64>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of distinct normalized names.
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Registers vertex `id` under `raw_name`.
    pub fn insert(&mut self, id: i64, raw_name: &str) {
        let key = normalize_name(raw_name);
        self.trie.insert(&key, id);
        self.ids.entry(key).or_default().push(id);
    }

    /// Returns all ids registered under a name, or an empty slice.
    pub fn lookup(&self, raw_name: &str) -> &[i64] {
        self.ids
            .get(&normalize_name(raw_name))
            .map(|ids| ids.as_slice())
            .unwrap_or_default()
    }

    /// Returns the most recently registered id under exactly this name.
    pub fn representative(&self, raw_name: &str) -> Option<i64> {
        self.trie.get(&normalize_name(raw_name)).copied()
    }

    /// Returns all normalized keys starting with the normalized `raw_prefix`,
    /// paired with the first id registered under each. Keys come out in
    /// lexicographic order.
    pub fn with_prefix(&self, raw_prefix: &str) -> Vec<(String, i64)> {
        self.trie
            .keys_with_prefix(&normalize_name(raw_prefix))
            .into_iter()
            .filter_map(|key| {
                let first = *self.ids.get(&key)?.first()?;
                Some((key, first))
            })
            .collect()
    }
}
