//! Key and index function types
//!
//! A store names objects with one [`KeyFunc`] and maintains one secondary
//! index per registered [`IndexFunc`]. Both are plain shared closures so a
//! store can be configured with presets or caller-supplied functions alike.

use mirrorcache_core::{CacheError, Result, StringSet};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// Values an index function derives from one object.
///
/// Most index functions yield zero or one value, so a single value is
/// stored inline.
pub type IndexValues = SmallVec<[String; 1]>;

/// Derives the store key of an object
pub type KeyFunc<T> = Arc<dyn Fn(&T) -> Result<String> + Send + Sync>;

/// Derives the values an object is indexed under
pub type IndexFunc<T> = Arc<dyn Fn(&T) -> Result<IndexValues> + Send + Sync>;

/// Index name -> index function
pub type Indexers<T> = HashMap<String, IndexFunc<T>>;

/// Indexed value -> keys of the objects that produced it
pub type Index = FxHashMap<String, StringSet>;

/// Index name -> index
pub type Indices = FxHashMap<String, Index>;

/// Wrap a closure as a [`KeyFunc`]
pub fn key_func<T, F>(f: F) -> KeyFunc<T>
where
    F: Fn(&T) -> Result<String> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as an [`IndexFunc`]
pub fn index_func<T, F>(f: F) -> IndexFunc<T>
where
    F: Fn(&T) -> Result<IndexValues> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Run a key function, reporting any failure as a key derivation error
pub(crate) fn derive_key<T: ?Sized>(key_func: &KeyFunc<T>, obj: &T) -> Result<String> {
    key_func(obj).map_err(|e| match e {
        e @ CacheError::KeyDerivation { .. } => e,
        other => CacheError::key_derivation(other.to_string()),
    })
}

/// Run one index function, reporting any failure against `index`
pub(crate) fn derive_values<T: ?Sized>(
    index: &str,
    index_func: &IndexFunc<T>,
    obj: &T,
) -> Result<StringSet> {
    match index_func(obj) {
        Ok(values) => Ok(values.into_iter().collect()),
        Err(e @ CacheError::IndexFunc { .. }) => Err(e),
        Err(other) => Err(CacheError::index_func(index, other.to_string())),
    }
}
