//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use storefront_cache::{AdminSession, LocalStore};
use storefront_data::{AdminClient, FeedClient};
use storefront_ui::AdminPage;

use crate::config::CliConfig;
use crate::output::Output;

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = PathBuf::from(path);
                (CliConfig::load(&path)?, Some(path))
            }
            // Try to find config in current directory or parent directories
            None => match find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };
        tracing::debug!(config = ?config_path, "loaded configuration");

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    pub fn feed_client(&self) -> Result<FeedClient> {
        FeedClient::with_timeout(&self.config.feed.url, self.config.feed.timeout())
            .context("Failed to build feed client")
    }

    pub fn admin_client(&self) -> Result<AdminClient> {
        AdminClient::with_timeout(&self.config.api.base_url, self.config.api.timeout())
            .context("Failed to build admin client")
    }

    /// Path of the local session store.
    pub fn session_path(&self) -> PathBuf {
        match &self.config.session.path {
            Some(path) => self.resolve_path(path),
            None => dirs_path().join("storefront").join("session.json"),
        }
    }

    pub fn session(&self) -> Result<AdminSession> {
        let path = self.session_path();
        let store = LocalStore::open(&path)
            .with_context(|| format!("Failed to open session store: {}", path.display()))?;
        Ok(AdminSession::new(store))
    }

    pub fn admin_page(&self) -> Result<AdminPage<AdminClient>> {
        Ok(AdminPage::new(
            self.admin_client()?,
            self.session()?,
            self.config.display.clone(),
        ))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// Find a config file in the directory tree.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Get the platform-specific data directory.
fn dirs_path() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        std::env::temp_dir()
    }
}
