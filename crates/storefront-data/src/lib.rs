//! Backend access for the storefront client.
//!
//! Two clients share one timeout policy:
//!
//! - [`FeedClient`] fetches the static product feed behind the [`FeedSource`]
//!   seam used by the catalog page.
//! - [`AdminClient`] implements [`CatalogApi`]: password check plus product
//!   create, update and delete with multipart bodies.
//!
//! Nothing here retries on its own; a failed load is retried by the user.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_data::{FeedClient, FeedSource};
//!
//! let client = FeedClient::new("http://127.0.0.1:5000/products.json")?;
//! let feed = client.fetch_products().await?;
//! println!("{} products", feed.len());
//! ```

mod admin;
mod client;
mod error;
mod form;
mod timeout;

pub use admin::{parse_auth_response, AdminClient, CatalogApi, DEFAULT_API_BASE};
pub use client::{FeedClient, FeedSource, DEFAULT_FEED_URL};
pub use error::FetchError;
pub use form::{parse_price, FormField, ImageUpload, ProductForm, ALLOWED_IMAGE_EXTENSIONS};
pub use timeout::TimeoutConfig;
