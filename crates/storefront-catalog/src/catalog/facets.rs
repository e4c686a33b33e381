//! Facet values for building filter controls.

use std::collections::BTreeSet;

use crate::catalog::{Product, TRENDING_TAG};

/// The distinct filter values present in a product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    /// Brand tags, sorted, without the trending sentinel.
    pub tags: Vec<String>,
    /// Categories, sorted.
    pub categories: Vec<String>,
}

impl Facets {
    /// Collect facet values from a list.
    pub fn from_products(products: &[Product]) -> Self {
        let mut tags = BTreeSet::new();
        let mut categories = BTreeSet::new();

        for product in products {
            tags.extend(
                product
                    .tags
                    .iter()
                    .filter(|t| t.as_str() != TRENDING_TAG)
                    .cloned(),
            );
            categories.extend(product.categories.iter().cloned());
        }

        Self {
            tags: tags.into_iter().collect(),
            categories: categories.into_iter().collect(),
        }
    }

    /// Whether there is anything to filter on.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.categories.is_empty()
    }
}
