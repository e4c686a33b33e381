//! Sort options for displayed products.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::error::CatalogError;

/// What to order by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Alphabetical by name.
    #[default]
    Name,
    /// By price.
    Price,
    /// Trending products first, then alphabetical.
    Trending,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Price => "price",
            SortKey::Trending => "trending",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortKey::Name => "Nombre",
            SortKey::Price => "Precio",
            SortKey::Trending => "Trending",
        }
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "price" => Ok(SortKey::Price),
            "trending" => Ok(SortKey::Trending),
            other => Err(CatalogError::ValidationError(format!("unknown sort key: {other}"))),
        }
    }
}

/// Sort direction. A single toggle shared by every key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// The other direction.
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn is_ascending(&self) -> bool {
        *self == SortDirection::Ascending
    }
}

/// The active ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct SortOption {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortOption {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Same key, opposite direction.
    pub fn toggled(self) -> Self {
        Self {
            key: self.key,
            direction: self.direction.toggle(),
        }
    }

    /// Compare two products under this option.
    ///
    /// Every key falls back to the name and then the id, so distinct
    /// products never compare equal and descending is the exact reverse of
    /// ascending.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let ordering = match self.key {
            SortKey::Name => by_name(a, b),
            SortKey::Price => a.price.total_cmp(&b.price).then_with(|| by_name(a, b)),
            SortKey::Trending => b
                .is_trending()
                .cmp(&a.is_trending())
                .then_with(|| by_name(a, b)),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

fn by_name(a: &Product, b: &Product) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Return a sorted copy of the list.
pub fn sort_products(products: &[Product], sort: SortOption) -> Vec<Product> {
    let mut sorted = products.to_vec();
    sorted.sort_by(|a, b| sort.compare(a, b));
    sorted
}
