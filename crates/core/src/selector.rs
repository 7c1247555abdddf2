//! Selector and rule engine
//!
//! A [`Selector`] is a conjunction of [`Rule`]s evaluated against one
//! [`Items`] view at a time. Views come in two kinds, attributes and tags,
//! and every rule declares the kind it expects. A rule handed the other
//! kind returns false without looking at its payload, so one selector can
//! mix attribute and tag rules; callers evaluate it once per view and
//! combine the results themselves.
//!
//! Selectors and rules are serde types so they can be loaded from
//! configuration alongside the cache options.

use crate::sets::StringSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Comparison applied by a rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Value equals one of the accepted values
    #[default]
    #[serde(rename = "==")]
    DoubleEquals,
    /// Key is present, value irrelevant
    #[serde(rename = "exists")]
    Exists,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::DoubleEquals => f.write_str("=="),
            Operator::Exists => f.write_str("exists"),
        }
    }
}

/// Kind of view a rule is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemsKind {
    /// Key/value attributes
    Attributes,
    /// Free-form tag values
    Tags,
}

impl fmt::Display for ItemsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemsKind::Attributes => f.write_str("attributes"),
            ItemsKind::Tags => f.write_str("tags"),
        }
    }
}

/// Borrowed view that rules are evaluated against
#[derive(Debug, Clone, Copy)]
pub enum Items<'a> {
    /// Attribute map view
    Attributes(&'a HashMap<String, String>),
    /// Tag set view
    Tags(&'a StringSet),
}

impl<'a> Items<'a> {
    /// View over an attribute map
    pub fn attributes(map: &'a HashMap<String, String>) -> Self {
        Items::Attributes(map)
    }

    /// View over a tag set
    pub fn tags(tags: &'a StringSet) -> Self {
        Items::Tags(tags)
    }

    /// Kind of this view
    pub fn kind(&self) -> ItemsKind {
        match self {
            Items::Attributes(_) => ItemsKind::Attributes,
            Items::Tags(_) => ItemsKind::Tags,
        }
    }

    /// Whether `v` exists as an attribute key or a tag
    pub fn has(&self, v: &str) -> bool {
        match self {
            Items::Attributes(map) => map.contains_key(v),
            Items::Tags(tags) => tags.has(v),
        }
    }

    /// Attribute value for `v`, or the tag itself when present
    pub fn get(&self, v: &str) -> Option<&'a str> {
        match *self {
            Items::Attributes(map) => map.get(v).map(String::as_str),
            Items::Tags(tags) => tags.iter().find(|t| *t == v),
        }
    }
}

/// Rule over attribute views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrRule {
    key: String,
    #[serde(default)]
    op: Operator,
    #[serde(default)]
    values: Vec<String>,
}

impl AttrRule {
    /// Create an attribute rule.
    ///
    /// `values` is ignored for [`Operator::Exists`]. An empty `values`
    /// list with [`Operator::DoubleEquals`] never matches.
    pub fn new<I, S>(key: impl Into<String>, op: Operator, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into(),
            op,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Rule matching when `key` is present
    pub fn exists(key: impl Into<String>) -> Self {
        Self::new(key, Operator::Exists, Vec::<String>::new())
    }

    /// Attribute key the rule inspects
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Operator of the rule
    pub fn op(&self) -> Operator {
        self.op
    }

    /// Accepted values
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Evaluate against a view
    pub fn matches(&self, items: &Items<'_>) -> bool {
        if items.kind() != ItemsKind::Attributes {
            return false;
        }
        match self.op {
            Operator::Exists => items.has(&self.key),
            Operator::DoubleEquals => {
                // a missing key reads as ""
                let actual = items.get(&self.key).unwrap_or("");
                self.values.iter().any(|v| v == actual)
            }
        }
    }
}

/// Rule over tag views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    value: String,
    #[serde(default)]
    op: Operator,
}

impl TagRule {
    /// Rule matching when `value` is among the tags
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            op: Operator::DoubleEquals,
        }
    }

    /// Tag value the rule looks for
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Evaluate against a view
    pub fn matches(&self, items: &Items<'_>) -> bool {
        if items.kind() != ItemsKind::Tags {
            return false;
        }
        match self.op {
            Operator::DoubleEquals => items.has(&self.value),
            // tag rules only support equality
            Operator::Exists => false,
        }
    }
}

/// A single selector rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Rule {
    /// Attribute rule
    Attribute(AttrRule),
    /// Tag rule
    Tag(TagRule),
}

impl Rule {
    /// Shorthand for [`AttrRule::new`]
    pub fn attr<I, S>(key: impl Into<String>, op: Operator, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::Attribute(AttrRule::new(key, op, values))
    }

    /// Shorthand for [`TagRule::new`]
    pub fn tag(value: impl Into<String>) -> Self {
        Rule::Tag(TagRule::new(value))
    }

    /// Kind of view this rule can match
    pub fn expects(&self) -> ItemsKind {
        match self {
            Rule::Attribute(_) => ItemsKind::Attributes,
            Rule::Tag(_) => ItemsKind::Tags,
        }
    }

    /// Evaluate against a view; false for a view of the wrong kind
    pub fn matches(&self, items: &Items<'_>) -> bool {
        match self {
            Rule::Attribute(rule) => rule.matches(items),
            Rule::Tag(rule) => rule.matches(items),
        }
    }
}

impl From<AttrRule> for Rule {
    fn from(rule: AttrRule) -> Self {
        Rule::Attribute(rule)
    }
}

impl From<TagRule> for Rule {
    fn from(rule: TagRule) -> Self {
        Rule::Tag(rule)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Attribute(r) => match r.op {
                Operator::DoubleEquals => write!(f, "{}=={}", r.key, r.values.join("|")),
                Operator::Exists => write!(f, "exists({})", r.key),
            },
            Rule::Tag(r) => write!(f, "tag{}{}", r.op, r.value),
        }
    }
}

/// Conjunction of rules.
///
/// An empty selector matches everything.
///
/// # Example
///
/// ```
/// use mirrorcache_core::selector::{Items, Operator, Rule, Selector};
/// use std::collections::HashMap;
///
/// let mut sel = Selector::new();
/// sel.add([Rule::attr("key2", Operator::DoubleEquals, ["val3"])]);
///
/// let mut attrs = HashMap::new();
/// attrs.insert("key2".to_string(), "val3".to_string());
/// assert!(sel.matches(&Items::attributes(&attrs)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector {
    rules: Vec<Rule>,
}

impl Selector {
    /// Create an empty selector
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rules
    pub fn add<I, R>(&mut self, rules: I) -> &mut Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Rule>,
    {
        self.rules.extend(rules.into_iter().map(Into::into));
        self
    }

    /// Builder form of [`Selector::add`] for a single rule
    pub fn with(mut self, rule: impl Into<Rule>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// True iff every rule matches `items`
    pub fn matches(&self, items: &Items<'_>) -> bool {
        self.rules.iter().all(|rule| rule.matches(items))
    }

    /// True iff no rules were added
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Rules in insertion order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl<R: Into<Rule>> FromIterator<R> for Selector {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", rule)?;
        }
        Ok(())
    }
}
