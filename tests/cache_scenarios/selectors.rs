//! Selectors loaded from JSON

use crate::test_utils::*;
use mirrorcache::{GenericLister, Items, Operator, ResourceMeta, Rule, Selector, StringSet};
use std::collections::HashMap;
use std::sync::Arc;

const GOLD_OR_SILVER: &str = r#"[
    {"type": "attribute", "key": "tier", "op": "==", "values": ["gold", "silver"]},
    {"type": "attribute", "key": "owner", "op": "exists"}
]"#;

#[test]
fn test_selector_from_json() {
    let sel: Selector = serde_json::from_str(GOLD_OR_SILVER).unwrap();
    assert_eq!(sel.len(), 2);
    assert_eq!(sel.to_string(), "tier==gold|silver,exists(owner)");

    let mut attrs = HashMap::new();
    attrs.insert("tier".to_string(), "silver".to_string());
    assert!(!sel.matches(&Items::attributes(&attrs)));
    attrs.insert("owner".to_string(), String::new());
    assert!(sel.matches(&Items::attributes(&attrs)));
}

#[test]
fn test_selector_serializes_back() {
    let sel = Selector::new().with(Rule::tag("edge"));
    let value = serde_json::to_value(&sel).unwrap();
    let again: Selector = serde_json::from_value(value).unwrap();
    assert_eq!(again.to_string(), "tag==edge");
}

#[test]
fn test_json_selector_drives_lister() {
    init_tracing();
    let cache = Arc::new(resource_cache());
    add_all(
        cache.as_ref(),
        [
            meta("a", "one").with_attribute("tier", "gold").with_attribute("owner", "x"),
            meta("b", "one").with_attribute("tier", "gold"),
            meta("c", "two").with_attribute("tier", "bronze").with_attribute("owner", "y"),
        ],
    );
    let lister = GenericLister::<ResourceMeta>::new(cache);
    let sel: Selector = serde_json::from_str(GOLD_OR_SILVER).unwrap();
    assert_eq!(keys_of(&lister.list(Some(&sel)).unwrap()), vec!["one/a"]);
}

#[test]
fn test_empty_selector_matches_everything() {
    let sel = Selector::new();
    assert!(sel.is_empty());
    assert!(sel.matches(&Items::attributes(&HashMap::new())));
    assert!(sel.matches(&Items::tags(&StringSet::new())));
}

#[test]
fn test_tag_rule_never_matches_attribute_keys() {
    let sel = Selector::new().with(Rule::tag("tier"));
    let mut attrs = HashMap::new();
    attrs.insert("tier".to_string(), "tier".to_string());
    assert!(!sel.matches(&Items::attributes(&attrs)));
}

#[test]
fn test_missing_attribute_matches_empty_value() {
    init_tracing();
    let cache = Arc::new(resource_cache());
    add_all(
        cache.as_ref(),
        [
            meta("a", "one").with_attribute("owner", "x"),
            meta("b", "one"),
        ],
    );
    let lister = GenericLister::<ResourceMeta>::new(cache);

    let unowned = Selector::new().with(Rule::attr("owner", Operator::DoubleEquals, [""]));
    assert_eq!(keys_of(&lister.list(Some(&unowned)).unwrap()), vec!["one/b"]);

    let owned = Selector::new().with(Rule::attr("owner", Operator::DoubleEquals, ["x", "y"]));
    assert_eq!(keys_of(&lister.list(Some(&owned)).unwrap()), vec!["one/a"]);
}
