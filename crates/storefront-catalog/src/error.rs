//! Catalog error types.

use thiserror::Error;

use crate::ids::ProductId;

/// Errors that can occur while handling catalog data.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Two records in one feed snapshot share an id.
    #[error("Duplicate product id in feed: {0}")]
    DuplicateId(ProductId),

    /// Price is negative or not a finite number.
    #[error("Invalid price: {0}")]
    InvalidPrice(f64),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::SerializationError(e.to_string())
    }
}
