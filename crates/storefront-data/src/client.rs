//! Product feed client.

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use storefront_catalog::ProductFeed;

use crate::error::FetchError;
use crate::timeout::{build_http, TimeoutConfig};

/// Default location of the static product feed.
pub const DEFAULT_FEED_URL: &str = "http://127.0.0.1:5000/products.json";

/// Anything that can produce a fresh product snapshot.
///
/// The catalog page only depends on this trait, so it can be driven by an
/// in-memory feed in tests.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch a new snapshot of the product list.
    async fn fetch_products(&self) -> Result<ProductFeed, FetchError>;
}

/// Fetches the product feed over HTTP.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    url: String,
    timeout: TimeoutConfig,
}

impl FeedClient {
    /// Create a client for the given feed URL with the default timeout.
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(url, TimeoutConfig::default())
    }

    /// Create a client with an explicit timeout.
    pub fn with_timeout(url: impl Into<String>, timeout: TimeoutConfig) -> Result<Self, FetchError> {
        let http = build_http(timeout).map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Self {
            http,
            url: url.into(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> TimeoutConfig {
        self.timeout
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn fetch_products(&self) -> Result<ProductFeed, FetchError> {
        tracing::debug!(url = %self.url, "fetching product feed");

        // Always bypass intermediary caches; admins expect edits to show up.
        let resp = self
            .http
            .get(&self.url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| FetchError::from_transport(e, self.timeout.total))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, status = status.as_u16(), "feed request failed");
            return Err(FetchError::Http {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| FetchError::from_transport(e, self.timeout.total))?;
        let feed = ProductFeed::from_json(&bytes)
            .map_err(|e| FetchError::Deserialization(e.to_string()))?;

        tracing::info!(
            products = feed.len(),
            generation = feed.generation(),
            "loaded product feed"
        );
        Ok(feed)
    }
}
