//! Cache configuration.
//!
//! [`CacheOptions`] selects the key function and the secondary indices a
//! [`Cache`] is built with. Options can be assembled with the builder
//! methods or read from JSON:
//!
//! ```
//! use mirrorcache_core::ResourceMeta;
//! use mirrorcache_storage::{CacheOptions, IndexPreset, Indexer};
//!
//! let opts = CacheOptions::from_json(r#"{"kind": "service", "indices": ["scope", "tags"]}"#).unwrap();
//! assert_eq!(opts.kind, "service");
//!
//! let cache = opts.build::<ResourceMeta>().unwrap();
//! assert_eq!(cache.get_indexers().len(), 2);
//! ```

use crate::index::{index_func, key_func, IndexFunc, Indexers, KeyFunc};
use crate::presets::{self, SCOPE_INDEX, TAGS_INDEX};
use crate::store::Cache;
use mirrorcache_core::{AsAccessor, CacheError, Result};
use serde::{Deserialize, Serialize};

/// How object keys are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPreset {
    /// `scope/name`, or `name` for unscoped objects (default).
    #[default]
    ScopeAndName,
    /// The object's identity.
    Identity,
}

impl KeyPreset {
    /// The key function this preset stands for
    pub fn key_func<T: AsAccessor + 'static>(self) -> KeyFunc<T> {
        match self {
            KeyPreset::ScopeAndName => key_func(presets::scope_and_name_key::<T>),
            KeyPreset::Identity => key_func(presets::identity_key::<T>),
        }
    }
}

/// A stock secondary index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexPreset {
    /// Objects by scope; registered under [`CacheOptions::scope_index`].
    Scope,
    /// Objects by tag; registered under `"tags"`.
    Tags,
}

impl IndexPreset {
    /// The index function this preset stands for
    pub fn index_func<T: AsAccessor + 'static>(self) -> IndexFunc<T> {
        match self {
            IndexPreset::Scope => index_func(presets::scope_index::<T>),
            IndexPreset::Tags => index_func(presets::tags_index::<T>),
        }
    }
}

/// Options for building a cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheOptions {
    /// Resource kind reported in lookup failures.
    pub kind: String,
    /// Key derivation.
    pub key: KeyPreset,
    /// Secondary indices to register.
    pub indices: Vec<IndexPreset>,
    /// Name the scope index is registered under.
    pub scope_index: String,
}

impl CacheOptions {
    /// Default options: scope/name keys and a scope index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON and validate them. Missing fields take
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let opts: CacheOptions = serde_json::from_str(json)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Set the resource kind.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Set the key preset.
    pub fn key(mut self, key: KeyPreset) -> Self {
        self.key = key;
        self
    }

    /// Enable an index preset.
    pub fn index(mut self, preset: IndexPreset) -> Self {
        if !self.indices.contains(&preset) {
            self.indices.push(preset);
        }
        self
    }

    /// Drop every index preset.
    pub fn without_indices(mut self) -> Self {
        self.indices.clear();
        self
    }

    /// Set the scope index name.
    pub fn scope_index(mut self, name: impl Into<String>) -> Self {
        self.scope_index = name.into();
        self
    }

    /// Check the options for conflicts.
    pub fn validate(&self) -> Result<()> {
        for (i, preset) in self.indices.iter().enumerate() {
            if self.indices[..i].contains(preset) {
                return Err(CacheError::InvalidConfig(format!(
                    "index preset {:?} listed more than once",
                    preset
                )));
            }
        }
        if self.indices.contains(&IndexPreset::Scope) {
            if self.scope_index.is_empty() {
                return Err(CacheError::InvalidConfig(
                    "scope index name must not be empty".to_string(),
                ));
            }
            if self.scope_index == TAGS_INDEX && self.indices.contains(&IndexPreset::Tags) {
                return Err(CacheError::InvalidConfig(format!(
                    "scope index name {:?} collides with the tags index",
                    self.scope_index
                )));
            }
        }
        Ok(())
    }

    /// Index functions for the enabled presets, keyed by index name.
    pub fn indexers<T: AsAccessor + 'static>(&self) -> Indexers<T> {
        self.indices
            .iter()
            .map(|preset| {
                let name = match preset {
                    IndexPreset::Scope => self.scope_index.clone(),
                    IndexPreset::Tags => TAGS_INDEX.to_string(),
                };
                (name, preset.index_func::<T>())
            })
            .collect()
    }

    /// Validate and build an empty cache.
    pub fn build<T: AsAccessor + Send + Sync + 'static>(&self) -> Result<Cache<T>> {
        self.validate()?;
        Ok(Cache::from_parts(self.key.key_func::<T>(), self.indexers::<T>()))
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            kind: "resource".to_string(),
            key: KeyPreset::ScopeAndName,
            indices: vec![IndexPreset::Scope],
            scope_index: SCOPE_INDEX.to_string(),
        }
    }
}
