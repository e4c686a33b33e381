//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use storefront_data::{TimeoutConfig, DEFAULT_API_BASE, DEFAULT_FEED_URL};
use storefront_ui::{CarouselConfig, DisplayConfig};

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Product feed.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Admin API.
    #[serde(default)]
    pub api: ApiConfig,

    /// Prices, placeholder image and card text.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Trending carousel.
    #[serde(default)]
    pub carousel: CarouselConfig,

    /// Local session storage.
    #[serde(default)]
    pub session: SessionConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

/// Product feed settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// URL of the products.json feed.
    #[serde(default = "default_feed_url")]
    pub url: String,

    /// Whole-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl FeedConfig {
    pub fn timeout(&self) -> TimeoutConfig {
        TimeoutConfig::from_millis(self.timeout_ms)
    }
}

/// Admin API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL; `/api/...` paths are appended.
    #[serde(default = "default_api_base")]
    pub base_url: String,

    /// Whole-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> TimeoutConfig {
        TimeoutConfig::from_millis(self.timeout_ms)
    }
}

/// Session storage settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Store file; defaults to the user data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Generate a default storefront.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Storefront client configuration

[feed]
url = "{feed}"
# Give up on the feed after this long.
timeout_ms = 10000

[api]
base_url = "{api}"
timeout_ms = 10000

[display]
currency = "CLP"
placeholder = "placeholder.jpg"
description_limit = 120

# Replace prices in the detail view with a purchase link.
# [display.contact]
# url = "https://instagram.com/your-shop"
# label = "Comprar"

[carousel]
# Auto-advance period; values under 100 are raised to 100.
interval_ms = 5000
drag_threshold_px = 50.0

[carousel.breakpoints]
small = 576
medium = 992

[session]
# path = ".storefront/session.json"
"#,
        feed = DEFAULT_FEED_URL,
        api = DEFAULT_API_BASE,
    )
}
