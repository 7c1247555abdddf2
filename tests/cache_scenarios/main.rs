//! Cache Scenario Test Suite
//!
//! End-to-end checks of the public `mirrorcache` surface.
//!
//! ## Modules
//!
//! - **store_consistency**: index bookkeeping across Add/Update/Delete
//! - **scoped_listing**: generic and scoped listers over resource metadata
//! - **selectors**: selectors loaded from JSON
//! - **config**: caches built from `CacheOptions`
//! - **concurrency**: producers and readers on separate threads
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test cache_scenarios
//! ```

mod test_utils;

mod concurrency;
mod selectors;
mod store_consistency;
