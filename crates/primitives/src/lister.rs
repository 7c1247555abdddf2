//! Lister primitive
//!
//! Read-only facade over an [`Indexer`].
//! Lists and gets cached objects, optionally narrowed to one scope and
//! filtered by a [`Selector`].
//!
//! # Design
//!
//! GenericLister is a stateless facade - it holds only an `Arc<dyn Indexer<T>>`
//! plus the resource kind and scope index name. Multiple listers sharing the
//! same cache see the same data. Clone is cheap (just Arc clone).
//!
//! # Example
//!
//! ```
//! use mirrorcache_core::{ResourceMeta, Selector, Rule, Operator};
//! use mirrorcache_primitives::GenericLister;
//! use mirrorcache_storage::{CacheOptions, Store};
//! use std::sync::Arc;
//!
//! let lister = GenericLister::<ResourceMeta>::from_options(&CacheOptions::new().kind("service")).unwrap();
//! lister
//!     .indexer()
//!     .add(Arc::new(ResourceMeta::new("svc1", "one").with_attribute("tier", "gold")))
//!     .unwrap();
//!
//! let sel = Selector::new().with(Rule::attr("tier", Operator::DoubleEquals, ["gold"]));
//! assert_eq!(lister.by_scope("one").list(Some(&sel)).unwrap().len(), 1);
//! assert!(lister.get("svc1").is_err());
//! assert!(lister.by_scope("one").get("svc1").is_ok());
//! ```

use mirrorcache_core::{
    accessor, vendor_attributes, Accessor, AsAccessor, CacheError, Items, Result, Selector,
};
use mirrorcache_storage::{presets, CacheOptions, Indexer, Store};
use std::sync::Arc;

/// Default resource kind reported in lookup failures
pub const DEFAULT_KIND: &str = "resource";

/// Lister over a whole cache
///
/// # Thread Safety
///
/// GenericLister is Clone and Send + Sync. Every call takes its own
/// snapshot from the underlying cache.
pub struct GenericLister<T> {
    /// Cache reference (shared)
    indexer: Arc<dyn Indexer<T>>,
    kind: String,
    scope_index: String,
}

impl<T> Clone for GenericLister<T> {
    fn clone(&self) -> Self {
        Self {
            indexer: Arc::clone(&self.indexer),
            kind: self.kind.clone(),
            scope_index: self.scope_index.clone(),
        }
    }
}

impl<T: AsAccessor + Send + Sync + 'static> GenericLister<T> {
    /// Create a lister with the default kind and scope index name
    ///
    /// # Arguments
    ///
    /// * `indexer` - Shared cache reference
    pub fn new(indexer: Arc<dyn Indexer<T>>) -> Self {
        Self::with_kind(indexer, DEFAULT_KIND, presets::SCOPE_INDEX)
    }

    /// Create a lister reporting `kind` and reading scopes from `scope_index`
    pub fn with_kind(
        indexer: Arc<dyn Indexer<T>>,
        kind: impl Into<String>,
        scope_index: impl Into<String>,
    ) -> Self {
        Self {
            indexer,
            kind: kind.into(),
            scope_index: scope_index.into(),
        }
    }

    /// Build a fresh cache from `opts` and a lister bound to it
    ///
    /// The cache is reachable through [`GenericLister::indexer`] for
    /// producers to feed.
    pub fn from_options(opts: &CacheOptions) -> Result<Self> {
        let cache = opts.build::<T>()?;
        Ok(Self::with_kind(
            Arc::new(cache),
            opts.kind.clone(),
            opts.scope_index.clone(),
        ))
    }

    /// The underlying cache
    pub fn indexer(&self) -> &Arc<dyn Indexer<T>> {
        &self.indexer
    }

    /// Resource kind reported in lookup failures
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Objects whose attributes match `selector`; everything when the
    /// selector is absent or empty
    pub fn list(&self, selector: Option<&Selector>) -> Result<Vec<Arc<T>>> {
        list_all(self.indexer.as_ref(), selector)
    }

    /// Object stored under the raw key `name`
    ///
    /// # Errors
    ///
    /// `NotFound` if no object is stored under `name`.
    pub fn get(&self, name: &str) -> Result<Arc<T>> {
        self.indexer
            .get_by_key(name)
            .ok_or_else(|| CacheError::NotFound {
                name: name.to_string(),
                kind: self.kind.clone(),
            })
    }

    /// Lister restricted to `scope`
    pub fn by_scope(&self, scope: impl Into<String>) -> ScopedLister<T> {
        ScopedLister {
            indexer: Arc::clone(&self.indexer),
            kind: self.kind.clone(),
            scope_index: self.scope_index.clone(),
            scope: scope.into(),
        }
    }
}

/// Lister over one scope of a cache
pub struct ScopedLister<T> {
    indexer: Arc<dyn Indexer<T>>,
    kind: String,
    scope_index: String,
    scope: String,
}

impl<T: AsAccessor + Send + Sync + 'static> ScopedLister<T> {
    /// The scope this lister is restricted to
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Objects in the scope matching `selector` by vendor details,
    /// attributes or tags
    pub fn list(&self, selector: Option<&Selector>) -> Result<Vec<Arc<T>>> {
        list_all_by_scope(self.indexer.as_ref(), &self.scope_index, &self.scope, selector)
    }

    /// Object named `name` in this scope
    ///
    /// # Errors
    ///
    /// `NotFound` if the scope holds no such object.
    pub fn get(&self, name: &str) -> Result<Arc<T>> {
        self.indexer
            .get_by_key(&presets::scope_key(&self.scope, name))
            .ok_or_else(|| CacheError::NotFound {
                name: name.to_string(),
                kind: self.kind.clone(),
            })
    }
}

impl<T> Clone for ScopedLister<T> {
    fn clone(&self) -> Self {
        Self {
            indexer: Arc::clone(&self.indexer),
            kind: self.kind.clone(),
            scope_index: self.scope_index.clone(),
            scope: self.scope.clone(),
        }
    }
}

impl<T> std::fmt::Debug for GenericLister<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericLister")
            .field("kind", &self.kind)
            .field("scope_index", &self.scope_index)
            .finish()
    }
}

impl<T> std::fmt::Debug for ScopedLister<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedLister")
            .field("kind", &self.kind)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Metadata of `obj`, logging objects that expose none
fn inspect<T: AsAccessor + ?Sized>(obj: &T) -> Result<&dyn Accessor> {
    accessor(obj).map_err(|e| {
        tracing::warn!(target: "mirrorcache::lister", error = %e, "list aborted on object without metadata");
        e
    })
}

/// Every object in `store` whose attribute view matches `selector`
///
/// An absent or empty selector selects everything without inspecting
/// objects.
pub fn list_all<T, S>(store: &S, selector: Option<&Selector>) -> Result<Vec<Arc<T>>>
where
    T: AsAccessor,
    S: Store<T> + ?Sized,
{
    let candidates = store.list();
    let Some(selector) = selector.filter(|s| !s.is_empty()) else {
        return Ok(candidates);
    };

    let total = candidates.len();
    let mut list = Vec::new();
    for obj in candidates {
        if selector.matches(&Items::attributes(inspect(obj.as_ref())?.attributes())) {
            list.push(obj);
        }
    }
    tracing::trace!(target: "mirrorcache::lister", %selector, total, matched = list.len(), "listed store");
    Ok(list)
}

/// Objects filed under `scope` in `scope_index` that match `selector`
///
/// An empty scope lists the whole store like [`list_all`]. Otherwise an
/// object matches when the selector accepts its vendor details, its
/// attributes or its tags, checked in that order.
///
/// # Errors
///
/// `NoSuchIndex` if `scope_index` is not registered; `NotAccessible` if a
/// candidate must be inspected but exposes no metadata.
pub fn list_all_by_scope<T, I>(
    indexer: &I,
    scope_index: &str,
    scope: &str,
    selector: Option<&Selector>,
) -> Result<Vec<Arc<T>>>
where
    T: AsAccessor,
    I: Indexer<T> + ?Sized,
{
    if scope.is_empty() {
        return list_all(indexer, selector);
    }

    let candidates = indexer.by_index(scope_index, scope)?;
    let Some(selector) = selector.filter(|s| !s.is_empty()) else {
        return Ok(candidates);
    };

    let total = candidates.len();
    let mut list = Vec::new();
    for obj in candidates {
        if matches_any_view(selector, inspect(obj.as_ref())?) {
            list.push(obj);
        }
    }
    tracing::trace!(target: "mirrorcache::lister", scope, %selector, total, matched = list.len(), "listed scope");
    Ok(list)
}

fn matches_any_view(selector: &Selector, meta: &dyn Accessor) -> bool {
    if let Some(details) = meta.vendor_details() {
        if selector.matches(&Items::attributes(&vendor_attributes(details))) {
            return true;
        }
    }
    selector.matches(&Items::attributes(meta.attributes())) || selector.matches(&Items::tags(meta.tags()))
}
