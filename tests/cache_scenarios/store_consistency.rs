//! Index bookkeeping across Add/Update/Delete

use crate::test_utils::*;
use mirrorcache::{Accessor, CacheError, Indexer, ResourceMeta, Store};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

#[test]
fn test_update_moves_object_between_tag_buckets() {
    init_tracing();
    let cache = resource_cache();
    add_all(&cache, [meta("svc1", "one").with_tag("blue").with_tag("edge")]);

    cache
        .update(Arc::new(meta("svc1", "one").with_tag("green").with_tag("edge")))
        .unwrap();

    assert!(cache.index_keys("tags", "blue").unwrap().is_empty());
    assert_eq!(cache.index_keys("tags", "green").unwrap(), vec!["one/svc1"]);
    assert_eq!(cache.index_keys("tags", "edge").unwrap(), vec!["one/svc1"]);
    assert_eq!(
        sorted(cache.list_index_func_values("tags")),
        vec!["edge", "green"]
    );
}

#[test]
fn test_delete_empties_every_index() {
    init_tracing();
    let cache = resource_cache();
    let svc = meta("svc1", "one").with_tag("a").with_tag("b");
    add_all(&cache, [svc.clone()]);

    cache.delete(&svc).unwrap();

    assert!(cache.is_empty());
    assert!(cache.list_index_func_values("scope").is_empty());
    assert!(cache.list_index_func_values("tags").is_empty());
}

#[test]
fn test_delete_uses_recorded_memberships() {
    init_tracing();
    let cache = resource_cache();
    add_all(&cache, [meta("svc1", "one").with_tag("old")]);

    // same key, different tags: the stored memberships are removed
    cache.delete(&meta("svc1", "one").with_tag("new")).unwrap();
    assert!(cache.list_index_func_values("tags").is_empty());
}

#[test]
fn test_scopeless_objects_skip_scope_index() {
    init_tracing();
    let cache = resource_cache();
    add_all(&cache, [meta("global", ""), meta("svc1", "one")]);

    assert_eq!(cache.len(), 2);
    assert!(cache.get_by_key("global").is_some());
    assert_eq!(cache.list_index_func_values("scope"), vec!["one"]);
}

#[test]
fn test_unknown_index_names() {
    let cache = resource_cache();
    assert!(matches!(
        cache.index_keys("owner", "x"),
        Err(CacheError::NoSuchIndex(_))
    ));
    assert!(matches!(
        cache.index("owner", &meta("svc1", "one")),
        Err(CacheError::NoSuchIndex(_))
    ));
    assert!(cache.list_index_func_values("owner").is_empty());
}

#[test]
fn test_get_returns_the_stored_arc() {
    let cache = resource_cache();
    let svc = Arc::new(meta("svc1", "one").with_attribute("tier", "gold"));
    cache.add(Arc::clone(&svc)).unwrap();

    let stored = cache.get(&meta("svc1", "one")).unwrap().unwrap();
    assert!(Arc::ptr_eq(&stored, &svc));
    assert_eq!(stored.attributes().get("tier").map(String::as_str), Some("gold"));
}

#[derive(Debug, Clone)]
enum Op {
    Put { name: u8, scope: u8, tags: Vec<u8> },
    Remove { name: u8, scope: u8 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..5, 0u8..3, prop::collection::vec(0u8..4, 0..4))
            .prop_map(|(name, scope, tags)| Op::Put { name, scope, tags }),
        1 => (0u8..5, 0u8..3).prop_map(|(name, scope)| Op::Remove { name, scope }),
    ]
}

fn scope_name(scope: u8) -> String {
    // scope 0 is unscoped
    if scope == 0 {
        String::new()
    } else {
        format!("s{}", scope)
    }
}

/// Bucket contents a fresh derivation over `objs` would give
fn fresh_buckets(
    objs: &BTreeMap<String, ResourceMeta>,
    derive: impl Fn(&ResourceMeta) -> Vec<String>,
) -> BTreeMap<String, Vec<String>> {
    let mut buckets: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, obj) in objs {
        for value in derive(obj) {
            buckets.entry(value).or_default().push(key.clone());
        }
    }
    for keys in buckets.values_mut() {
        keys.sort();
        keys.dedup();
    }
    buckets
}

fn actual_buckets(cache: &mirrorcache::Cache<ResourceMeta>, index: &str) -> BTreeMap<String, Vec<String>> {
    cache
        .list_index_func_values(index)
        .into_iter()
        .map(|value| {
            let keys = sorted(cache.index_keys(index, &value).unwrap());
            (value, keys)
        })
        .collect()
}

proptest! {
    #[test]
    fn test_indices_track_fresh_derivation(ops in prop::collection::vec(op(), 1..50)) {
        let cache = resource_cache();
        let mut model: BTreeMap<String, ResourceMeta> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Put { name, scope, tags } => {
                    let mut obj = meta(&format!("n{}", name), &scope_name(scope));
                    for t in tags {
                        obj = obj.with_tag(format!("t{}", t));
                    }
                    let key = cache.key_of(&obj).unwrap();
                    cache.add(Arc::new(obj.clone())).unwrap();
                    model.insert(key, obj);
                }
                Op::Remove { name, scope } => {
                    let obj = meta(&format!("n{}", name), &scope_name(scope));
                    let key = cache.key_of(&obj).unwrap();
                    cache.delete(&obj).unwrap();
                    model.remove(&key);
                }
            }
        }

        prop_assert_eq!(sorted(cache.list_keys()), model.keys().cloned().collect::<Vec<_>>());
        prop_assert_eq!(
            actual_buckets(&cache, "scope"),
            fresh_buckets(&model, |m| if m.scope.is_empty() { vec![] } else { vec![m.scope.clone()] })
        );
        prop_assert_eq!(
            actual_buckets(&cache, "tags"),
            fresh_buckets(&model, |m| m.tags.list())
        );
    }
}
