//! Core types for mirrorcache
//!
//! This crate holds the pieces every other layer builds on:
//! - `sets`: `StringSet`, the value type of index buckets
//! - `accessor`: the metadata capability cached objects expose
//! - `selector`: attribute/tag rules and their conjunction
//! - `error`: the shared error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accessor;
pub mod error;
pub mod selector;
pub mod sets;

pub use accessor::{accessor, vendor_attributes, Accessor, AsAccessor, ResourceMeta, VendorDetails};
pub use error::{CacheError, Result};
pub use selector::{AttrRule, Items, ItemsKind, Operator, Rule, Selector, TagRule};
pub use sets::StringSet;
