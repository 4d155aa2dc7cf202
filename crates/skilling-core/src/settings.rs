//! Read-only view over hierarchical settings.
//!
//! Keys are `:`-separated paths (`Section:Child`). A list is stored as indexed
//! children (`Key:0`, `Key:1`, ...). Key lookup is ASCII case-insensitive.

use std::collections::BTreeMap;

use crate::error::Result;

/// Separator between key path segments.
pub const KEY_DELIMITER: char = ':';

/// Source of configuration values consulted at decision time.
pub trait SettingsSource: Send + Sync {
    /// Scalar value stored directly at `key`.
    fn value(&self, key: &str) -> Result<Option<String>>;

    /// Values stored at `key:0`, `key:1`, ... ordered by index.
    fn list(&self, key: &str) -> Result<Vec<String>>;
}

/// Index of `candidate` when it is a direct indexed child of `key`.
pub fn indexed_child(key: &str, candidate: &str) -> Option<usize> {
    if candidate.len() <= key.len() + 1 || !candidate.is_char_boundary(key.len()) {
        return None;
    }
    let (head, tail) = candidate.split_at(key.len());
    if !head.eq_ignore_ascii_case(key) {
        return None;
    }
    tail.strip_prefix(KEY_DELIMITER)?.parse().ok()
}

/// Collect indexed children of `key` from `(key, value)` pairs, ordered by index.
pub fn collect_list<'a, I>(key: &str, pairs: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut items: Vec<(usize, String)> = pairs
        .into_iter()
        .filter_map(|(k, v)| indexed_child(key, k).map(|i| (i, v.to_string())))
        .collect();
    items.sort_by_key(|(i, _)| *i);
    items.into_iter().map(|(_, v)| v).collect()
}

impl SettingsSource for BTreeMap<String, String> {
    fn value(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.clone()))
    }

    fn list(&self, key: &str) -> Result<Vec<String>> {
        Ok(collect_list(
            key,
            self.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        ))
    }
}
