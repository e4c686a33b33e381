//! Feed snapshots.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::catalog::Product;
use crate::error::CatalogError;
use crate::ids::ProductId;

static GENERATION: AtomicU64 = AtomicU64::new(1);

/// One fetched copy of the product list.
///
/// A snapshot is read-only; a re-fetch produces a new snapshot with a new
/// generation rather than patching this one.
#[derive(Debug, Clone)]
pub struct ProductFeed {
    products: Arc<[Product]>,
    generation: u64,
}

impl ProductFeed {
    /// Wrap a freshly fetched list.
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into(),
            generation: GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// An empty snapshot.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Parse a JSON array of product records.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_slice(bytes)?;
        Ok(Self::new(products))
    }

    /// Unique stamp of this snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// All products in feed order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products carrying the trending sentinel, in feed order.
    pub fn trending(&self) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.is_trending())
            .cloned()
            .collect()
    }

    /// Check snapshot-wide invariants (unique ids).
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::with_capacity(self.products.len());
        for product in self.products.iter() {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(())
    }
}

impl Default for ProductFeed {
    fn default() -> Self {
        Self::empty()
    }
}
