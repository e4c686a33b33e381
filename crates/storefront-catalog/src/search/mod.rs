//! Search module.
//!
//! Contains the term and filter predicates, sort options and the
//! memoizing filter engine.

mod engine;
mod filter;
mod query;

pub use engine::FilterEngine;
pub use filter::{filter_products, FilterSet, SearchTerm};
pub use query::{sort_products, SortDirection, SortKey, SortOption};
