//! Search term and tag/category filters.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// A free-text search term.
///
/// Surrounding whitespace is dropped; an empty term matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchTerm {
    raw: String,
    folded: String,
}

impl SearchTerm {
    /// Create a term from user input.
    pub fn new(input: impl AsRef<str>) -> Self {
        let raw = input.as_ref().trim().to_string();
        let folded = raw.to_lowercase();
        Self { raw, folded }
    }

    /// The trimmed term as typed.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Case-insensitive substring match against name or description.
    pub fn matches(&self, product: &Product) -> bool {
        self.is_empty()
            || product.name.to_lowercase().contains(&self.folded)
            || product.description.to_lowercase().contains(&self.folded)
    }
}

/// Active filter values, one independent set per dimension.
///
/// Within a dimension a product needs at least one selected value; across
/// dimensions every non-empty set must match. Sets compare by content, so
/// the order in which values were selected does not matter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSet {
    /// Selected brand tags.
    pub tags: BTreeSet<String>,
    /// Selected categories.
    pub categories: BTreeSet<String>,
}

impl FilterSet {
    /// Create an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Select a category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    /// Flip a tag's selection. Returns whether it is now selected.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        toggle(&mut self.tags, tag)
    }

    /// Flip a category's selection. Returns whether it is now selected.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        toggle(&mut self.categories, category)
    }

    /// Drop every selection.
    pub fn clear(&mut self) {
        self.tags.clear();
        self.categories.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.categories.is_empty()
    }

    /// Number of selected values across both dimensions.
    pub fn len(&self) -> usize {
        self.tags.len() + self.categories.len()
    }

    /// Check a product against both dimensions.
    pub fn matches(&self, product: &Product) -> bool {
        let tag_match = self.tags.is_empty() || self.tags.iter().any(|t| product.has_tag(t));
        let category_match = self.categories.is_empty()
            || self.categories.iter().any(|c| product.has_category(c));
        tag_match && category_match
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) -> bool {
    if set.remove(value) {
        false
    } else {
        set.insert(value.to_string());
        true
    }
}

/// Keep the products matching the term and every active filter dimension.
///
/// Feed order is preserved; ordering is a separate step.
pub fn filter_products(products: &[Product], term: &SearchTerm, filters: &FilterSet) -> Vec<Product> {
    products
        .iter()
        .filter(|p| term.matches(p) && filters.matches(p))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new(1, "Funko Goku", 12990.0)
                .with_description("Figura coleccionable de Dragon Ball")
                .with_category("Figuras")
                .with_tag("Funko")
                .with_tag("trending"),
            Product::new(2, "Polera Naruto", 9990.0)
                .with_description("Polera de algodón")
                .with_category("Poleras")
                .with_tag("Bandai"),
            Product::new(3, "Taza Pikachu", 5990.0)
                .with_description("Taza de cerámica con Pikachu")
                .with_category("Tazas")
                .with_category("Figuras")
                .with_tag("Nintendo"),
            Product::new(4, "Peluche Pikachu", 14990.0)
                .with_category("Peluches")
                .with_tag("Nintendo")
                .with_tag("trending"),
        ]
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id.get()).collect()
    }

    #[test]
    fn test_term_is_trimmed_and_case_insensitive() {
        let term = SearchTerm::new("  PIKACHU ");
        assert_eq!(term.as_str(), "PIKACHU");
        let result = filter_products(&catalog(), &term, &FilterSet::new());
        assert_eq!(ids(&result), vec![3, 4]);
    }

    #[test]
    fn test_term_matches_description() {
        let result = filter_products(&catalog(), &SearchTerm::new("algodón"), &FilterSet::new());
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_no_constraints_returns_all() {
        let result = filter_products(&catalog(), &SearchTerm::default(), &FilterSet::new());
        assert_eq!(ids(&result), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_or_within_dimension() {
        let filters = FilterSet::new().with_tag("Funko").with_tag("Bandai");
        let result = filter_products(&catalog(), &SearchTerm::default(), &filters);
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_and_across_dimensions() {
        let filters = FilterSet::new().with_tag("Nintendo").with_category("Figuras");
        let result = filter_products(&catalog(), &SearchTerm::default(), &filters);
        assert_eq!(ids(&result), vec![3]);
    }

    #[test]
    fn test_no_matches_is_empty_not_error() {
        let result = filter_products(&catalog(), &SearchTerm::new("zelda"), &FilterSet::new());
        assert!(result.is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let term = SearchTerm::new("a");
        let filters = FilterSet::new().with_category("Figuras");
        let once = filter_products(&catalog(), &term, &filters);
        let twice = filter_products(&once, &term, &filters);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_result_partitions_input() {
        let all = catalog();
        let term = SearchTerm::new("pi");
        let filters = FilterSet::new().with_tag("Nintendo").with_category("Peluches");
        let kept = filter_products(&all, &term, &filters);

        for product in &all {
            let predicate = term.matches(product) && filters.matches(product);
            assert_eq!(kept.contains(product), predicate, "product {}", product.id);
        }
    }

    #[test]
    fn test_set_equality_ignores_selection_order() {
        let mut a = FilterSet::new();
        a.toggle_tag("Nintendo");
        a.toggle_tag("Funko");
        let mut b = FilterSet::new();
        b.toggle_tag("Funko");
        b.toggle_tag("Nintendo");
        assert_eq!(a, b);
    }

    #[test]
    fn test_toggle_and_clear() {
        let mut filters = FilterSet::new();
        assert!(filters.toggle_category("Tazas"));
        assert_eq!(filters.len(), 1);
        assert!(!filters.toggle_category("Tazas"));
        assert!(filters.is_empty());

        filters.toggle_tag("Funko");
        filters.toggle_category("Figuras");
        filters.clear();
        assert!(filters.is_empty());
    }
}
