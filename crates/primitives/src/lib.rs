//! Primitives layer for mirrorcache
//!
//! This crate implements the read-side primitives:
//! - GenericLister: list/get across a whole cache
//! - ScopedLister: list/get within one scope, matching vendor details,
//!   attributes or tags
//!
//! All listers are stateless facades over a shared `Indexer`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod lister;

pub use lister::{list_all, list_all_by_scope, GenericLister, ScopedLister};
