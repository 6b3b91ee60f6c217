//! Shared test utilities for the portfolio-layout test suite.
//!
//! Provides store fixtures and lookup helpers that panic with a clear
//! message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (store, cats) = store_with_categories(&["Finance", "Data"]);
//! store.save_profile(LayoutProfile::new("Fin").with_category(cats[0].id)).unwrap();
//!
//! let profile = find_profile(&store, "fin");
//! assert_eq!(site_default_count(&store), 0);
//! ```

use crate::models::{Category, LayoutProfile};
use crate::store::ConfigStore;

// =========================================================================
// Fixture setup
// =========================================================================

/// In-memory store with one category per name, returned in the same order.
pub fn store_with_categories(names: &[&str]) -> (ConfigStore, Vec<Category>) {
    let store = ConfigStore::in_memory();
    let categories = names
        .iter()
        .map(|name| store.create_category(name, "").unwrap())
        .collect();
    (store, categories)
}

// =========================================================================
// Store lookups
// =========================================================================

/// Find a profile by slug. Panics if not found.
pub fn find_profile(store: &ConfigStore, slug: &str) -> LayoutProfile {
    let profiles = store.profiles();
    profiles
        .iter()
        .find(|p| p.slug == slug)
        .cloned()
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = profiles.iter().map(|p| p.slug.as_str()).collect();
            panic!("profile '{slug}' not found. Available: {slugs:?}")
        })
}

/// Number of profiles flagged as site default.
pub fn site_default_count(store: &ConfigStore) -> usize {
    store
        .profiles()
        .iter()
        .filter(|p| p.is_site_default)
        .count()
}
