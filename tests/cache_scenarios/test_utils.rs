//! Shared helpers for the scenario suite

use mirrorcache::{presets, Cache, CacheOptions, IndexPreset, ResourceMeta, Store};
use std::sync::Arc;

/// Install a test-writer subscriber once per binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Cache keyed by scope/name with scope and tags indices
pub fn resource_cache() -> Cache<ResourceMeta> {
    CacheOptions::new()
        .index(IndexPreset::Tags)
        .build::<ResourceMeta>()
        .expect("default options are valid")
}

pub fn meta(name: &str, scope: &str) -> ResourceMeta {
    ResourceMeta::new(name, scope)
}

pub fn add_all<S>(cache: &S, objs: impl IntoIterator<Item = ResourceMeta>)
where
    S: Store<ResourceMeta> + ?Sized,
{
    for obj in objs {
        cache.add(Arc::new(obj)).expect("add");
    }
}

/// Sorted `scope/name` of each object
pub fn keys_of(objs: &[Arc<ResourceMeta>]) -> Vec<String> {
    let mut keys: Vec<_> = objs
        .iter()
        .map(|m| presets::scope_key(&m.scope, &m.name))
        .collect();
    keys.sort();
    keys
}

pub fn sorted(mut values: Vec<String>) -> Vec<String> {
    values.sort();
    values
}
