//! Storage layer for mirrorcache
//!
//! This crate implements the indexed object store:
//! - Index types: key and index functions, index maps
//! - ThreadSafeStore: one lock over the primary map and every index
//! - Cache: key-deriving Store/Indexer facade
//! - Presets and CacheOptions: stock key/index functions and configuration
//!
//! Objects are held as `Arc<T>`; the store never clones or mutates them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod index;
pub mod options;
pub mod presets;
pub mod store;
pub mod thread_safe;

pub use index::{
    index_func, key_func, Index, IndexFunc, IndexValues, Indexers, Indices, KeyFunc,
};
pub use options::{CacheOptions, IndexPreset, KeyPreset};
pub use presets::{SCOPE_INDEX, TAGS_INDEX};
pub use store::{Cache, Indexer, Store};
pub use thread_safe::ThreadSafeStore;
