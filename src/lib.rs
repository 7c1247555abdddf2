//! mirrorcache: in-memory, secondarily-indexed object cache.
//!
//! This crate re-exports the public surface of the workspace crates.

// ============================================================================
// Object model
// ============================================================================

// String sets
pub use mirrorcache_core::StringSet;

// Accessor capability and the stock metadata type
pub use mirrorcache_core::{accessor, vendor_attributes, Accessor, AsAccessor, ResourceMeta, VendorDetails};

// Errors
pub use mirrorcache_core::{CacheError, Result};

// ============================================================================
// Selectors
// ============================================================================

pub use mirrorcache_core::{AttrRule, Items, ItemsKind, Operator, Rule, Selector, TagRule};

// ============================================================================
// Store and indices
// ============================================================================

pub use mirrorcache_storage::{
    index_func, key_func, presets, Cache, CacheOptions, IndexFunc, IndexPreset, IndexValues,
    Indexer, Indexers, KeyFunc, KeyPreset, Store, ThreadSafeStore,
};

// ============================================================================
// Listers
// ============================================================================

pub use mirrorcache_primitives::{list_all, list_all_by_scope, GenericLister, ScopedLister};
