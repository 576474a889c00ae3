//! # Memtable
//!
//! The in-memory ordered buffer of not-yet-flushed writes (§3, §4.2).
//!
//! Backed by a `BTreeMap` so that iteration, and therefore every SST a flush
//! produces, is always in ascending key order with no extra sort step.
//! Unlike the teacher's memtable, entries carry no sequence number: this
//! design has none anywhere (§3's Entry is a bare `{tag, payload}`), and
//! ordering between conflicting writes is just "last write wins" since
//! there is exactly one writer (§5).

use std::collections::BTreeMap;

/// The value side of a memtable entry: either a live value or a tombstone.
///
/// A `Del` carries no payload at all, not even optionally — `SPEC_FULL.md`
/// §D notes that a tombstone's observed prior value (if carried anywhere)
/// lives only in the return value of `Engine::del`, never in the memtable
/// or on disk, so there is nothing for this variant to hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaggedValue {
    Set(Vec<u8>),
    Del,
}

impl TaggedValue {
    #[must_use]
    pub fn is_tombstone(&self) -> bool {
        matches!(self, TaggedValue::Del)
    }
}

/// An ordered key → tagged-value map.
#[derive(Debug, Default)]
pub struct Memtable {
    map: BTreeMap<Vec<u8>, TaggedValue>,
}

impl Memtable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Inserts or overwrites `key` with a live value.
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.map.insert(key, TaggedValue::Set(value));
    }

    /// Inserts or overwrites `key` with a tombstone.
    pub fn delete(&mut self, key: Vec<u8>) {
        self.map.insert(key, TaggedValue::Del);
    }

    /// Returns the current tagged value for `key`, if any binding exists.
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<&TaggedValue> {
        self.map.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.map.contains_key(key)
    }

    /// Iterates all bindings in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &TaggedValue)> {
        self.map.iter().map(|(k, v)| (k.as_slice(), v))
    }

    /// Number of distinct keys bound, including tombstones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The smallest key currently bound, if any.
    #[must_use]
    pub fn min_key(&self) -> Option<&[u8]> {
        self.map.keys().next().map(Vec::as_slice)
    }

    /// The largest key currently bound, if any.
    #[must_use]
    pub fn max_key(&self) -> Option<&[u8]> {
        self.map.keys().next_back().map(Vec::as_slice)
    }

    /// Drops every binding. Called once a flush has durably written them.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

#[cfg(test)]
mod tests;
