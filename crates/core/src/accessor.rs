//! Accessor capability over cached objects
//!
//! The store never inspects concrete object shapes. Listers, selectors and
//! the key/index presets reach resource metadata only through [`Accessor`],
//! which any object type exposes via [`AsAccessor`].
//!
//! [`ResourceMeta`] is the stock implementation: the metadata block that
//! mirrored resources carry, usable directly as a cached object.

use crate::error::{CacheError, Result};
use crate::sets::StringSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Vendor-extension details attached to a resource
pub type VendorDetails = serde_json::Map<String, serde_json::Value>;

/// Read-only view of a resource's metadata.
pub trait Accessor {
    /// Stable identity, e.g. a server-assigned resource id
    fn identity(&self) -> &str;

    /// Scope name; empty when the resource is unscoped
    fn scope(&self) -> &str;

    /// Resource name
    fn name(&self) -> &str;

    /// Free-form tags
    fn tags(&self) -> &StringSet;

    /// Attribute key/value pairs
    fn attributes(&self) -> &HashMap<String, String>;

    /// Vendor-extension details, if the resource carries any
    fn vendor_details(&self) -> Option<&VendorDetails>;
}

/// Objects that may expose an [`Accessor`].
///
/// Returns `None` when the object carries no resource metadata; callers
/// surface that as [`CacheError::NotAccessible`] via [`accessor`].
pub trait AsAccessor {
    /// Borrow the metadata view, if any
    fn as_accessor(&self) -> Option<&dyn Accessor>;
}

/// Extract the accessor capability or fail with `NotAccessible`
pub fn accessor<T: AsAccessor + ?Sized>(obj: &T) -> Result<&dyn Accessor> {
    obj.as_accessor().ok_or(CacheError::NotAccessible)
}

/// Flatten vendor details into string attributes.
///
/// Strings are kept verbatim, `null` becomes the empty string and every
/// other value is rendered as compact JSON text.
pub fn vendor_attributes(details: &VendorDetails) -> HashMap<String, String> {
    details
        .iter()
        .map(|(k, v)| {
            let value = match v {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            (k.clone(), value)
        })
        .collect()
}

/// Metadata of a mirrored resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMeta {
    /// Server-assigned identity
    #[serde(default)]
    pub id: String,
    /// Resource name
    pub name: String,
    /// Scope the resource lives in (empty for unscoped resources)
    #[serde(default)]
    pub scope: String,
    /// Free-form tags
    #[serde(default)]
    pub tags: StringSet,
    /// Attribute key/value pairs
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    /// Vendor-extension details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_details: Option<VendorDetails>,
}

impl ResourceMeta {
    /// Create metadata for `name` in `scope` with a fresh random identity
    pub fn new(name: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            scope: scope.into(),
            ..Self::default()
        }
    }

    /// Replace the identity
    pub fn with_identity(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set one attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Add one tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert_one(tag);
        self
    }

    /// Replace the vendor details
    pub fn with_vendor_details(mut self, details: VendorDetails) -> Self {
        self.vendor_details = Some(details);
        self
    }
}

impl Accessor for ResourceMeta {
    fn identity(&self) -> &str {
        &self.id
    }

    fn scope(&self) -> &str {
        &self.scope
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tags(&self) -> &StringSet {
        &self.tags
    }

    fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    fn vendor_details(&self) -> Option<&VendorDetails> {
        self.vendor_details.as_ref()
    }
}

impl AsAccessor for ResourceMeta {
    fn as_accessor(&self) -> Option<&dyn Accessor> {
        Some(self)
    }
}
