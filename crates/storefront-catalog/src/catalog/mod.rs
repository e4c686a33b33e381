//! Product catalog module.
//!
//! Contains the product record, feed snapshots and facet extraction.

mod facets;
mod feed;
mod product;

pub use facets::Facets;
pub use feed::ProductFeed;
pub use product::{Product, DEFAULT_PLACEHOLDER, TRENDING_TAG};
