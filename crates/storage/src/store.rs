//! Store and Indexer facades
//!
//! [`Store`] is the keyed create/update/delete/list contract that watch
//! producers drive; [`Indexer`] extends it with secondary-index queries.
//! [`Cache`] implements both on top of [`ThreadSafeStore`], deriving keys
//! with its configured key function.
//!
//! # Example
//!
//! ```
//! use mirrorcache_core::ResourceMeta;
//! use mirrorcache_storage::{presets, Cache, Indexer, Store};
//! use std::sync::Arc;
//!
//! let cache: Cache<ResourceMeta> =
//!     Cache::with_indexers(presets::scope_and_name_key::<ResourceMeta>, presets::scope_indexers());
//! cache.add(Arc::new(ResourceMeta::new("svc1", "one"))).unwrap();
//!
//! assert!(cache.get_by_key("one/svc1").is_some());
//! assert_eq!(cache.index_keys("scope", "one").unwrap(), vec!["one/svc1"]);
//! ```

use crate::index::{derive_key, Indexers, KeyFunc};
use crate::thread_safe::ThreadSafeStore;
use mirrorcache_core::Result;
use std::sync::Arc;

/// Keyed object storage.
///
/// Implementations must be safe to share across threads; mutations are
/// linearizable and reads never observe a half-applied mutation.
pub trait Store<T>: Send + Sync {
    /// Insert or replace `obj` under its derived key
    fn add(&self, obj: Arc<T>) -> Result<()>;

    /// Same contract as [`Store::add`]
    fn update(&self, obj: Arc<T>) -> Result<()>;

    /// Remove the entry under `obj`'s derived key, if any
    fn delete(&self, obj: &T) -> Result<()>;

    /// Look up the entry under `obj`'s derived key
    fn get(&self, obj: &T) -> Result<Option<Arc<T>>>;

    /// Look up the entry under `key`
    fn get_by_key(&self, key: &str) -> Option<Arc<T>>;

    /// Point-in-time snapshot of every stored object, unordered
    fn list(&self) -> Vec<Arc<T>>;

    /// Every stored key, unordered
    fn list_keys(&self) -> Vec<String>;
}

/// A [`Store`] with named secondary indices.
pub trait Indexer<T>: Store<T> {
    /// Objects sharing any value `obj` derives under `index_name`
    fn index(&self, index_name: &str, obj: &T) -> Result<Vec<Arc<T>>>;

    /// Keys in one bucket; empty when the bucket does not exist
    fn index_keys(&self, index_name: &str, indexed_value: &str) -> Result<Vec<String>>;

    /// Objects in one bucket; empty when the bucket does not exist
    fn by_index(&self, index_name: &str, indexed_value: &str) -> Result<Vec<Arc<T>>>;

    /// Every value that has a bucket in `index_name`
    fn list_index_func_values(&self, index_name: &str) -> Vec<String>;

    /// Registered index functions
    fn get_indexers(&self) -> Indexers<T>;

    /// Register more index functions; only allowed on an empty store
    fn add_indexers(&self, new_indexers: Indexers<T>) -> Result<()>;
}

/// Indexed object cache.
///
/// Holds a key function and a [`ThreadSafeStore`]. Cloning objects never
/// happens: the cache keeps the `Arc` it was handed.
pub struct Cache<T> {
    key_func: KeyFunc<T>,
    storage: ThreadSafeStore<T>,
}

impl<T: Send + Sync + 'static> Cache<T> {
    /// Create a cache without secondary indices
    pub fn new<F>(key_func: F) -> Self
    where
        F: Fn(&T) -> Result<String> + Send + Sync + 'static,
    {
        Self::with_indexers(key_func, Indexers::default())
    }

    /// Create a cache with the given secondary indices
    pub fn with_indexers<F>(key_func: F, indexers: Indexers<T>) -> Self
    where
        F: Fn(&T) -> Result<String> + Send + Sync + 'static,
    {
        Self::from_parts(Arc::new(key_func), indexers)
    }

    /// Create a cache from an already shared key function
    pub fn from_parts(key_func: KeyFunc<T>, indexers: Indexers<T>) -> Self {
        Self {
            key_func,
            storage: ThreadSafeStore::new(indexers),
        }
    }

    /// Derive the key `obj` would be stored under
    pub fn key_of(&self, obj: &T) -> Result<String> {
        derive_key(&self.key_func, obj)
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    fn upsert(&self, op: &'static str, obj: Arc<T>) -> Result<()> {
        let key = self.key_of(&obj)?;
        let replaced = self.storage.upsert(key.clone(), obj)?;
        tracing::debug!(target: "mirrorcache::store", op, key = %key, replaced, "stored object");
        Ok(())
    }
}

impl<T: Send + Sync + 'static> Store<T> for Cache<T> {
    fn add(&self, obj: Arc<T>) -> Result<()> {
        self.upsert("add", obj)
    }

    fn update(&self, obj: Arc<T>) -> Result<()> {
        self.upsert("update", obj)
    }

    fn delete(&self, obj: &T) -> Result<()> {
        let key = self.key_of(obj)?;
        let existed = self.storage.delete(&key).is_some();
        tracing::debug!(target: "mirrorcache::store", key = %key, existed, "deleted object");
        Ok(())
    }

    fn get(&self, obj: &T) -> Result<Option<Arc<T>>> {
        let key = self.key_of(obj)?;
        Ok(self.storage.get(&key))
    }

    fn get_by_key(&self, key: &str) -> Option<Arc<T>> {
        self.storage.get(key)
    }

    fn list(&self) -> Vec<Arc<T>> {
        self.storage.list()
    }

    fn list_keys(&self) -> Vec<String> {
        self.storage.list_keys()
    }
}

impl<T: Send + Sync + 'static> Indexer<T> for Cache<T> {
    fn index(&self, index_name: &str, obj: &T) -> Result<Vec<Arc<T>>> {
        self.storage.index(index_name, obj)
    }

    fn index_keys(&self, index_name: &str, indexed_value: &str) -> Result<Vec<String>> {
        self.storage.index_keys(index_name, indexed_value)
    }

    fn by_index(&self, index_name: &str, indexed_value: &str) -> Result<Vec<Arc<T>>> {
        self.storage.by_index(index_name, indexed_value)
    }

    fn list_index_func_values(&self, index_name: &str) -> Vec<String> {
        self.storage.list_index_func_values(index_name)
    }

    fn get_indexers(&self) -> Indexers<T> {
        self.storage.get_indexers()
    }

    fn add_indexers(&self, new_indexers: Indexers<T>) -> Result<()> {
        let mut names: Vec<String> = new_indexers.keys().cloned().collect();
        names.sort();
        match self.storage.add_indexers(new_indexers) {
            Ok(()) => {
                tracing::debug!(target: "mirrorcache::store", indexers = ?names, "registered indexers");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(target: "mirrorcache::store", indexers = ?names, error = %e, "rejected indexers");
                Err(e)
            }
        }
    }
}

impl<T> std::fmt::Debug for Cache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("storage", &self.storage)
            .finish()
    }
}
