//! Error taxonomy for the object cache
//!
//! Every failure is returned to the immediate caller. Nothing in the cache
//! retries, and a failed mutation never leaves partial state behind.

use thiserror::Error;

/// Errors raised by stores, indexers, listers and configuration.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The key function could not produce a key for an object
    #[error("cannot derive key: {reason}")]
    KeyDerivation {
        /// Why derivation failed
        reason: String,
    },

    /// An index function failed for an object
    #[error("index function {index} failed: {reason}")]
    IndexFunc {
        /// Index whose function failed
        index: String,
        /// Why the function failed
        reason: String,
    },

    /// A caller referenced an index that was never registered
    #[error("index with name {0} does not exist")]
    NoSuchIndex(String),

    /// `add_indexers` named an index that already exists
    #[error("indexer conflict: {0:?} already registered")]
    IndexersAlreadyRegistered(Vec<String>),

    /// `add_indexers` was called on a store that already holds objects
    #[error("cannot add indexers to a populated store ({items} items)")]
    IndexAddAfterPopulation {
        /// Number of objects in the store at the time of the call
        items: usize,
    },

    /// A lister lookup found no entry
    #[error("item {name} of kind {kind} was not found in the store")]
    NotFound {
        /// Name that was looked up
        name: String,
        /// Resource kind served by the lister
        kind: String,
    },

    /// An object does not expose the accessor capability
    #[error("object does not expose resource metadata")]
    NotAccessible,

    /// Configuration is structurally valid but semantically wrong
    #[error("invalid cache configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be parsed
    #[error("cannot parse cache configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl CacheError {
    /// Shorthand for a key derivation failure
    pub fn key_derivation(reason: impl Into<String>) -> Self {
        CacheError::KeyDerivation {
            reason: reason.into(),
        }
    }

    /// Shorthand for an index function failure
    pub fn index_func(index: impl Into<String>, reason: impl Into<String>) -> Self {
        CacheError::IndexFunc {
            index: index.into(),
            reason: reason.into(),
        }
    }

    /// True for the lister's normal negative result
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound { .. })
    }
}

/// Result alias used across the cache crates
pub type Result<T> = std::result::Result<T, CacheError>;
