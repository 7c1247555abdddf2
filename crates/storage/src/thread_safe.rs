//! Thread-safe keyed storage with secondary indices
//!
//! One `RwLock` guards the primary map and every index together, so a
//! mutation's map write and its index writes are observed as one step.
//!
//! # Design
//!
//! - FxHashMap: O(1) lookups, fast non-crypto hash
//! - Entry records the values each key is filed under, per index
//! - Update applies only the diff between old and new filed values
//! - Delete removes exactly the recorded memberships
//!
//! # Thread Safety
//!
//! - add/update/delete/add_indexers: exclusive lock
//! - every read: shared lock, results are materialized before release

use crate::index::{derive_values, Index, Indexers, Indices};
use mirrorcache_core::{CacheError, Result, StringSet};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A stored object and the index values its key is filed under
struct Entry<T> {
    object: Arc<T>,
    /// index name -> values
    filed_under: FxHashMap<String, StringSet>,
}

struct Inner<T> {
    items: FxHashMap<String, Entry<T>>,
    indexers: Indexers<T>,
    indices: Indices,
}

impl<T> Inner<T> {
    /// Compute every index's values for `obj` without touching state
    fn derive_all(&self, obj: &T) -> Result<FxHashMap<String, StringSet>> {
        let mut filed_under =
            FxHashMap::with_capacity_and_hasher(self.indexers.len(), Default::default());
        for (name, index_func) in &self.indexers {
            filed_under.insert(name.clone(), derive_values(name, index_func, obj)?);
        }
        Ok(filed_under)
    }

    fn materialize<'a, I>(&self, keys: I) -> Vec<Arc<T>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        keys.into_iter()
            .filter_map(|key| self.items.get(key).map(|e| Arc::clone(&e.object)))
            .collect()
    }
}

fn file_key(index: &mut Index, value: &str, key: &str) {
    index
        .entry(value.to_string())
        .or_default()
        .insert_one(key);
}

fn unfile_key(index: &mut Index, value: &str, key: &str) {
    if let Some(bucket) = index.get_mut(value) {
        bucket.delete_one(key);
        if bucket.is_empty() {
            index.remove(value);
        }
    }
}

/// Keyed object storage plus named secondary indices.
///
/// Keys are supplied by the caller; key derivation lives one layer up in
/// [`Cache`](crate::Cache).
pub struct ThreadSafeStore<T> {
    inner: RwLock<Inner<T>>,
}

impl<T> ThreadSafeStore<T> {
    /// Create a store with the given index functions
    pub fn new(indexers: Indexers<T>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                items: FxHashMap::default(),
                indexers,
                indices: Indices::default(),
            }),
        }
    }

    /// Insert or replace the object under `key`.
    ///
    /// Index values are derived before anything is written, so an index
    /// function failure leaves the store unchanged. Returns true when an
    /// existing entry was replaced.
    pub fn upsert(&self, key: String, object: Arc<T>) -> Result<bool> {
        let mut guard = self.inner.write();
        let filed_under = guard.derive_all(&object)?;

        let inner = &mut *guard;
        let previous = inner.items.remove(&key);
        let existed = previous.is_some();
        let mut stale = previous.map(|e| e.filed_under).unwrap_or_default();

        for (name, new_values) in &filed_under {
            let index = inner.indices.entry(name.clone()).or_default();
            match stale.remove(name) {
                Some(old_values) => {
                    for value in old_values.difference(new_values).iter() {
                        unfile_key(index, value, &key);
                    }
                    for value in new_values.difference(&old_values).iter() {
                        file_key(index, value, &key);
                    }
                }
                None => {
                    for value in new_values.iter() {
                        file_key(index, value, &key);
                    }
                }
            }
        }
        // memberships under indices the new derivation did not visit
        for (name, old_values) in &stale {
            if let Some(index) = inner.indices.get_mut(name) {
                for value in old_values.iter() {
                    unfile_key(index, value, &key);
                }
            }
        }

        inner.items.insert(key, Entry { object, filed_under });
        Ok(existed)
    }

    /// Remove the entry under `key` and every index membership it holds
    pub fn delete(&self, key: &str) -> Option<Arc<T>> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let entry = inner.items.remove(key)?;
        for (name, values) in &entry.filed_under {
            if let Some(index) = inner.indices.get_mut(name) {
                for value in values.iter() {
                    unfile_key(index, value, key);
                }
            }
        }
        Some(entry.object)
    }

    /// Get the object under `key`
    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        self.inner
            .read()
            .items
            .get(key)
            .map(|e| Arc::clone(&e.object))
    }

    /// Check if a key exists
    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().items.contains_key(key)
    }

    /// Snapshot of all stored objects
    pub fn list(&self) -> Vec<Arc<T>> {
        self.inner
            .read()
            .items
            .values()
            .map(|e| Arc::clone(&e.object))
            .collect()
    }

    /// Snapshot of all keys
    pub fn list_keys(&self) -> Vec<String> {
        self.inner.read().items.keys().cloned().collect()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().items.is_empty()
    }

    /// Objects sharing any of the values `obj` derives for `index_name`.
    ///
    /// The values are recomputed from `obj` itself, not looked up.
    pub fn index(&self, index_name: &str, obj: &T) -> Result<Vec<Arc<T>>> {
        let inner = self.inner.read();
        let index_func = inner
            .indexers
            .get(index_name)
            .ok_or_else(|| CacheError::NoSuchIndex(index_name.to_string()))?;
        let values = derive_values(index_name, index_func, obj)?;
        let Some(index) = inner.indices.get(index_name) else {
            return Ok(Vec::new());
        };

        if values.len() == 1 {
            // single bucket: no union needed
            return Ok(values
                .iter()
                .next()
                .and_then(|v| index.get(v))
                .map(|bucket| inner.materialize(bucket.iter()))
                .unwrap_or_default());
        }

        let mut keys = StringSet::new();
        for value in values.iter() {
            if let Some(bucket) = index.get(value) {
                keys.extend(bucket.iter());
            }
        }
        Ok(inner.materialize(keys.iter()))
    }

    /// Keys in the bucket `indexed_value` of `index_name`
    pub fn index_keys(&self, index_name: &str, indexed_value: &str) -> Result<Vec<String>> {
        let inner = self.inner.read();
        if !inner.indexers.contains_key(index_name) {
            return Err(CacheError::NoSuchIndex(index_name.to_string()));
        }
        Ok(inner
            .indices
            .get(index_name)
            .and_then(|index| index.get(indexed_value))
            .map(|bucket| bucket.unsorted_list())
            .unwrap_or_default())
    }

    /// Objects in the bucket `indexed_value` of `index_name`
    pub fn by_index(&self, index_name: &str, indexed_value: &str) -> Result<Vec<Arc<T>>> {
        let inner = self.inner.read();
        if !inner.indexers.contains_key(index_name) {
            return Err(CacheError::NoSuchIndex(index_name.to_string()));
        }
        let Some(bucket) = inner
            .indices
            .get(index_name)
            .and_then(|index| index.get(indexed_value))
        else {
            return Ok(Vec::new());
        };
        Ok(inner.materialize(bucket.iter()))
    }

    /// Every value that currently has a bucket in `index_name`
    pub fn list_index_func_values(&self, index_name: &str) -> Vec<String> {
        self.inner
            .read()
            .indices
            .get(index_name)
            .map(|index| index.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Registered index functions
    pub fn get_indexers(&self) -> Indexers<T> {
        self.inner.read().indexers.clone()
    }

    /// Names of the registered indices
    pub fn index_names(&self) -> Vec<String> {
        self.inner.read().indexers.keys().cloned().collect()
    }

    /// Register more index functions.
    ///
    /// Only allowed while the store is empty: existing entries would need
    /// a full rebuild to be filed under the new indices.
    pub fn add_indexers(&self, new_indexers: Indexers<T>) -> Result<()> {
        let mut inner = self.inner.write();
        if !inner.items.is_empty() {
            return Err(CacheError::IndexAddAfterPopulation {
                items: inner.items.len(),
            });
        }

        let mut conflicts: Vec<String> = new_indexers
            .keys()
            .filter(|name| inner.indexers.contains_key(*name))
            .cloned()
            .collect();
        if !conflicts.is_empty() {
            conflicts.sort();
            return Err(CacheError::IndexersAlreadyRegistered(conflicts));
        }

        inner.indexers.extend(new_indexers);
        Ok(())
    }

    /// Buckets of `index_name` with their sorted keys, for consistency checks
    #[cfg(test)]
    pub(crate) fn buckets(&self, index_name: &str) -> Vec<(String, Vec<String>)> {
        let inner = self.inner.read();
        let mut buckets: Vec<_> = inner
            .indices
            .get(index_name)
            .map(|index| {
                index
                    .iter()
                    .map(|(value, keys)| (value.clone(), keys.list()))
                    .collect()
            })
            .unwrap_or_default();
        buckets.sort();
        buckets
    }
}

impl<T> Default for ThreadSafeStore<T> {
    fn default() -> Self {
        Self::new(Indexers::default())
    }
}

impl<T> std::fmt::Debug for ThreadSafeStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        let mut names: Vec<_> = inner.indexers.keys().collect();
        names.sort();
        f.debug_struct("ThreadSafeStore")
            .field("items", &inner.items.len())
            .field("indexers", &names)
            .finish()
    }
}
