//! Unordered string set
//!
//! `StringSet` is the value type of every secondary index bucket: an index
//! maps a derived value to the set of keys whose objects produced it.
//!
//! # Semantics
//!
//! - All operations are total; nothing here can fail
//! - Equality and superset checks are defined purely on membership
//! - `list()` is the only ordered view (lexicographic)

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A mutable set of strings with standard set algebra.
///
/// Backed by an `FxHashSet` for O(1) membership checks.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringSet {
    items: FxHashSet<String>,
}

impl StringSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set with room for `capacity` items
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: FxHashSet::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Build a set from the keys of any keyed collection.
    ///
    /// Callers already know their concrete map type, so they hand over the
    /// key sequence (`map.keys()`) rather than the map itself.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        keys.into_iter().collect()
    }

    /// Add items to the set
    pub fn insert<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items.extend(items.into_iter().map(Into::into));
        self
    }

    /// Add a single item, returning true if it was not already present
    pub fn insert_one(&mut self, item: impl Into<String>) -> bool {
        self.items.insert(item.into())
    }

    /// Remove items from the set
    pub fn delete<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for item in items {
            self.items.remove(item.as_ref());
        }
        self
    }

    /// Remove a single item, returning true if it was present
    pub fn delete_one(&mut self, item: &str) -> bool {
        self.items.remove(item)
    }

    /// True if and only if `item` is contained in the set
    #[inline]
    pub fn has(&self, item: &str) -> bool {
        self.items.contains(item)
    }

    /// True if and only if every one of `items` is contained in the set
    pub fn has_all<I, S>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        items.into_iter().all(|item| self.has(item.as_ref()))
    }

    /// True if any of `items` is contained in the set
    pub fn has_any<I, S>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        items.into_iter().any(|item| self.has(item.as_ref()))
    }

    /// Items in `self` that are not in `other`
    pub fn difference(&self, other: &StringSet) -> StringSet {
        self.items
            .iter()
            .filter(|item| !other.has(item))
            .cloned()
            .collect()
    }

    /// Items in either `self` or `other`
    pub fn union(&self, other: &StringSet) -> StringSet {
        let mut result = StringSet::with_capacity(self.len() + other.len());
        result.items.extend(self.items.iter().cloned());
        result.items.extend(other.items.iter().cloned());
        result
    }

    /// Items in both `self` and `other`
    ///
    /// Walks the smaller operand and probes the larger one.
    pub fn intersection(&self, other: &StringSet) -> StringSet {
        let (walk, probe) = if self.len() < other.len() {
            (self, other)
        } else {
            (other, self)
        };
        walk.items
            .iter()
            .filter(|item| probe.has(item))
            .cloned()
            .collect()
    }

    /// True if and only if `self` contains every item of `other`
    pub fn is_superset(&self, other: &StringSet) -> bool {
        other.items.iter().all(|item| self.has(item))
    }

    /// True if and only if both sets have identical membership
    pub fn equal(&self, other: &StringSet) -> bool {
        self.len() == other.len() && self.is_superset(other)
    }

    /// Contents as a lexicographically sorted vector
    pub fn list(&self) -> Vec<String> {
        let mut res = self.unsorted_list();
        res.sort_unstable();
        res
    }

    /// Contents in arbitrary order
    pub fn unsorted_list(&self) -> Vec<String> {
        self.items.iter().cloned().collect()
    }

    /// Remove and return an arbitrary item, or `None` if the set is empty
    pub fn pop_any(&mut self) -> Option<String> {
        let item = self.items.iter().next()?.clone();
        self.items.remove(&item);
        Some(item)
    }

    /// Number of items in the set
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the set is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the items in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(String::as_str)
    }
}

impl PartialEq for StringSet {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for StringSet {}

impl fmt::Debug for StringSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.list()).finish()
    }
}

impl<S: Into<String>> FromIterator<S> for StringSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for StringSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.items.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for StringSet {
    type Item = String;
    type IntoIter = std::collections::hash_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a StringSet {
    type Item = &'a String;
    type IntoIter = std::collections::hash_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
