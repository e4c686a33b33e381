//! Product records as served by the feed.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CatalogError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// Tag value marking a product as eligible for the trending carousel.
///
/// It is a sentinel, not a brand: it never shows up as a filter control.
pub const TRENDING_TAG: &str = "trending";

/// Image shown when a product has none.
pub const DEFAULT_PLACEHOLDER: &str = "placeholder.jpg";

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Price in the shop currency, as a plain number.
    pub price: f64,
    /// Free text description.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Image URL or path relative to the site root.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub image: Option<String>,
    /// Categories, in display order.
    #[serde(default, deserialize_with = "null_as_empty_vec")]
    pub categories: Vec<String>,
    /// Tags (brands, plus the trending sentinel), in display order.
    #[serde(default, deserialize_with = "null_as_empty_vec")]
    pub tags: Vec<String>,
    /// Stock keeping unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Units in stock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

impl Product {
    /// Create a product with the required fields.
    pub fn new(id: i64, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            price,
            description: String::new(),
            image: None,
            categories: Vec::new(),
            tags: Vec::new(),
            sku: None,
            stock: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the image path.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        let image = image.into();
        self.image = if image.trim().is_empty() { None } else { Some(image) };
        self
    }

    /// Add a category, keeping insertion order and skipping duplicates.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.add_category(category);
        self
    }

    /// Add a tag, keeping insertion order and skipping duplicates.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.add_tag(tag);
        self
    }

    /// Add a category to this product.
    pub fn add_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
    }

    /// Add a tag to this product.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Check whether the product carries a tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Check whether the product belongs to a category.
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Check if the product is shown in the trending carousel.
    pub fn is_trending(&self) -> bool {
        self.has_tag(TRENDING_TAG)
    }

    /// Tags meant for display and filtering (sentinel removed).
    pub fn brand_tags(&self) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .map(String::as_str)
            .filter(|t| *t != TRENDING_TAG)
    }

    /// Image to display, falling back to the placeholder.
    pub fn image_src<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.image.as_deref().unwrap_or(placeholder)
    }

    /// The price as money in the given currency.
    pub fn money(&self, currency: Currency) -> Money {
        Money::from_decimal(self.price, currency)
    }

    /// Check the record's own invariants.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CatalogError::InvalidPrice(self.price));
        }
        if self.name.trim().is_empty() {
            return Err(CatalogError::ValidationError(format!(
                "product {} has an empty name",
                self.id
            )));
        }
        Ok(())
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

fn null_as_empty_vec<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(d)?.unwrap_or_default())
}

// The backend stores "" when no image was uploaded.
fn blank_as_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(d)?.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_creation() {
        let product = Product::new(1, "Funko Goku", 12990.0)
            .with_category("Figuras")
            .with_tag("Funko")
            .with_tag("Funko");
        assert_eq!(product.name, "Funko Goku");
        assert_eq!(product.tags, vec!["Funko".to_string()]);
        assert!(product.has_category("Figuras"));
        assert!(!product.is_trending());
    }

    #[test]
    fn test_deserialize_backend_record() {
        let json = r#"{"id": 3, "name": "Polera", "price": 9990.0,
                       "description": null, "image": "", "tags": ["trending", "Nike"]}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.description, "");
        assert_eq!(product.image, None);
        assert!(product.categories.is_empty());
        assert!(product.is_trending());
        assert_eq!(product.brand_tags().collect::<Vec<_>>(), vec!["Nike"]);
    }

    #[test]
    fn test_image_src_falls_back() {
        let product = Product::new(1, "A", 1.0);
        assert_eq!(product.image_src(DEFAULT_PLACEHOLDER), "placeholder.jpg");

        let product = product.with_image("uploads/a_1f2e.png");
        assert_eq!(product.image_src(DEFAULT_PLACEHOLDER), "uploads/a_1f2e.png");

        let product = Product::new(2, "B", 1.0).with_image("   ");
        assert_eq!(product.image, None);
    }

    #[test]
    fn test_money_conversion() {
        let product = Product::new(1, "A", 12990.0);
        assert_eq!(product.money(Currency::CLP).display(), "$12.990 CLP");
    }

    #[test]
    fn test_validate() {
        assert!(Product::new(1, "A", 0.0).validate().is_ok());
        assert!(matches!(
            Product::new(1, "A", -1.0).validate(),
            Err(CatalogError::InvalidPrice(_))
        ));
        assert!(Product::new(1, " ", 1.0).validate().is_err());
    }
}
