//! CLI command implementations.

pub mod admin;
pub mod browse;
pub mod config;
pub mod trending;

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use storefront_catalog::SortKey;

/// Sort criterion accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Name,
    Price,
    Trending,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortKey::Name,
            SortArg::Price => SortKey::Price,
            SortArg::Trending => SortKey::Trending,
        }
    }
}

/// Search, filter and sort options shared by `browse` and `show`.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Case-insensitive text matched against name and description.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Brand tag filter (repeatable; any of them matches).
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Category filter (repeatable; any of them matches).
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Sort criterion.
    #[arg(long, value_enum, default_value = "name")]
    pub sort: SortArg,

    /// Sort descending.
    #[arg(long)]
    pub desc: bool,
}

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Print the card markup instead of a table.
    #[arg(long)]
    pub html: bool,
}

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Position of the card in the browse result (0-based).
    pub index: usize,

    #[command(flatten)]
    pub query: QueryArgs,

    /// Print the detail markup instead of a summary.
    #[arg(long)]
    pub html: bool,
}

/// Arguments for the trending command.
#[derive(Args)]
pub struct TrendingArgs {
    /// Viewport width in pixels, which picks items per view.
    #[arg(short, long, default_value = "1200")]
    pub width: u32,

    /// Keep running and auto-advance on the configured interval.
    #[arg(long)]
    pub watch: bool,

    /// Stop watching after this many advances.
    #[arg(long)]
    pub ticks: Option<u64>,
}

/// Arguments for the admin command.
#[derive(Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Product fields for create and update.
#[derive(Args, Debug, Clone, Default)]
pub struct ProductFields {
    /// Product name.
    #[arg(long)]
    pub name: Option<String>,

    /// Price, a non-negative number.
    #[arg(long)]
    pub price: Option<String>,

    /// Description text.
    #[arg(long)]
    pub description: Option<String>,

    /// Categories, comma-separated.
    #[arg(long)]
    pub categories: Option<String>,

    /// Tags, comma-separated (use "trending" to feature in the carousel).
    #[arg(long)]
    pub tags: Option<String>,

    /// Image file to upload (png, jpg, jpeg or gif).
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Log in to the admin dashboard.
    Login {
        /// Password (prompted for when omitted).
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the admin session.
    Logout,
    /// Show whether a session is active.
    Status,
    /// List products.
    List {
        /// Print the table markup.
        #[arg(long)]
        html: bool,
    },
    /// Add a product.
    Create(ProductFields),
    /// Edit a product; omitted fields keep their current value.
    Update {
        /// Product id.
        id: i64,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product.
    Delete {
        /// Product id.
        id: i64,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
    /// Write a default storefront.toml.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
