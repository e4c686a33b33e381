//! Filter engine with last-input memoization.

use std::sync::Arc;

use crate::catalog::{Product, ProductFeed};
use crate::search::{filter_products, FilterSet, SearchTerm};

/// Inputs a filter result depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FilterKey {
    generation: u64,
    term: SearchTerm,
    filters: FilterSet,
}

/// Filters a feed, reusing the previous result when the inputs repeat.
///
/// The cache is keyed on the feed generation as well as the term and
/// filters, so a re-fetched feed never serves a stale result. Skipping the
/// cache gives identical output.
#[derive(Debug, Default)]
pub struct FilterEngine {
    last: Option<(FilterKey, Arc<[Product]>)>,
    hits: u64,
    misses: u64,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the feed, consulting the retained result first.
    pub fn filter(&mut self, feed: &ProductFeed, term: &SearchTerm, filters: &FilterSet) -> Arc<[Product]> {
        let key = FilterKey {
            generation: feed.generation(),
            term: term.clone(),
            filters: filters.clone(),
        };

        if let Some((last_key, result)) = &self.last {
            if *last_key == key {
                self.hits += 1;
                tracing::trace!(term = term.as_str(), "filter cache hit");
                return Arc::clone(result);
            }
        }

        self.misses += 1;
        let result: Arc<[Product]> = filter_products(feed.products(), term, filters).into();
        tracing::debug!(
            term = term.as_str(),
            filters = filters.len(),
            matched = result.len(),
            total = feed.len(),
            "filtered catalog"
        );
        self.last = Some((key, Arc::clone(&result)));
        result
    }

    /// Forget the retained result.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Number of calls answered from the retained result.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of calls that recomputed.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}
