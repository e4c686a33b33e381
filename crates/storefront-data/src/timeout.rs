//! Timeout configuration for outbound requests.

use std::time::Duration;

/// Timeout configuration for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Connection timeout.
    pub connect: Duration,
    /// Total operation timeout, body included.
    pub total: Duration,
}

impl TimeoutConfig {
    /// Create a new timeout configuration.
    pub fn new(connect: Duration, total: Duration) -> Self {
        Self {
            connect: connect.min(total),
            total,
        }
    }

    /// Create from a single total timeout.
    pub fn from_total(total: Duration) -> Self {
        Self {
            connect: Duration::from_millis(total.as_millis() as u64 / 4),
            total,
        }
    }

    /// Create from a total in milliseconds, as written in config files.
    pub fn from_millis(total_ms: u64) -> Self {
        Self::from_total(Duration::from_millis(total_ms))
    }
}

impl Default for TimeoutConfig {
    /// Ten seconds end to end, the bound the catalog page has always used.
    fn default() -> Self {
        Self::from_total(Duration::from_secs(10))
    }
}

/// Build an HTTP client enforcing the given timeouts.
pub(crate) fn build_http(timeout: TimeoutConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(timeout.connect)
        .timeout(timeout.total)
        .user_agent(concat!("storefront/", env!("CARGO_PKG_VERSION")))
        .build()
}
