//! Key and index function presets for resource objects
//!
//! Resource-specific behaviour ships as named functions over the
//! [`AsAccessor`] capability instead of separate store implementations.

use crate::index::{index_func, IndexValues, Indexers};
use mirrorcache_core::{AsAccessor, CacheError, Result};
use smallvec::smallvec;

/// Default name of the scope index
pub const SCOPE_INDEX: &str = "scope";

/// Default name of the tags index
pub const TAGS_INDEX: &str = "tags";

/// Compound key for `name` in `scope`: `scope/name`, or `name` when unscoped
pub fn scope_key(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", scope, name)
    }
}

/// Key function: `scope/name`, or `name` for unscoped objects
pub fn scope_and_name_key<T: AsAccessor + ?Sized>(obj: &T) -> Result<String> {
    let meta = obj
        .as_accessor()
        .ok_or_else(|| CacheError::key_derivation("object does not expose resource metadata"))?;
    if meta.name().is_empty() {
        return Err(CacheError::key_derivation("object has an empty name"));
    }
    Ok(scope_key(meta.scope(), meta.name()))
}

/// Key function: the raw identity
pub fn identity_key<T: AsAccessor + ?Sized>(obj: &T) -> Result<String> {
    let meta = obj
        .as_accessor()
        .ok_or_else(|| CacheError::key_derivation("object does not expose resource metadata"))?;
    if meta.identity().is_empty() {
        return Err(CacheError::key_derivation("object has an empty identity"));
    }
    Ok(meta.identity().to_string())
}

/// Index function: the object's scope, nothing for unscoped objects
pub fn scope_index<T: AsAccessor + ?Sized>(obj: &T) -> Result<IndexValues> {
    let meta = obj.as_accessor().ok_or_else(|| {
        CacheError::index_func(SCOPE_INDEX, "object does not expose resource metadata")
    })?;
    if meta.scope().is_empty() {
        return Ok(IndexValues::new());
    }
    Ok(smallvec![meta.scope().to_string()])
}

/// Index function: one value per tag
pub fn tags_index<T: AsAccessor + ?Sized>(obj: &T) -> Result<IndexValues> {
    let meta = obj.as_accessor().ok_or_else(|| {
        CacheError::index_func(TAGS_INDEX, "object does not expose resource metadata")
    })?;
    Ok(meta.tags().iter().map(str::to_string).collect())
}

/// Indexers containing only the scope index under [`SCOPE_INDEX`]
pub fn scope_indexers<T: AsAccessor + 'static>() -> Indexers<T> {
    let mut indexers = Indexers::default();
    indexers.insert(SCOPE_INDEX.to_string(), index_func(scope_index::<T>));
    indexers
}
