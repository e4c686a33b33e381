//! Catalog domain types and logic for the storefront client.
//!
//! This crate provides everything that can be computed without a network or
//! a display:
//!
//! - **Catalog**: products, feed snapshots, facets for filter controls
//! - **Money**: currency-aware price formatting
//! - **Search**: the filter/sort engine with last-input memoization
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_catalog::prelude::*;
//!
//! let feed = ProductFeed::new(products);
//! let mut filters = FilterSet::default();
//! filters.toggle_category("Figuras");
//!
//! let mut engine = FilterEngine::new();
//! let matched = engine.filter(&feed, &SearchTerm::new("goku"), &filters);
//! let ordered = sort_products(&matched, SortOption::default());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod search;

pub use error::CatalogError;
pub use ids::ProductId;
pub use money::{Currency, Money};

pub use catalog::{Facets, Product, ProductFeed, DEFAULT_PLACEHOLDER, TRENDING_TAG};
pub use search::{
    filter_products, sort_products, FilterEngine, FilterSet, SearchTerm, SortDirection, SortKey,
    SortOption,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CatalogError;
    pub use crate::ids::ProductId;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Facets, Product, ProductFeed, TRENDING_TAG};

    // Search
    pub use crate::search::{
        filter_products, sort_products, FilterEngine, FilterSet, SearchTerm, SortDirection,
        SortKey, SortOption,
    };
}
