//! Storefront CLI - terminal client for the storefront catalog.
//!
//! Commands:
//! - `storefront browse` - Search, filter and sort the catalog
//! - `storefront show` - Show one product's details
//! - `storefront trending` - Show the trending carousel
//! - `storefront admin` - Manage products
//! - `storefront config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::{AdminArgs, BrowseArgs, ConfigArgs, ShowArgs, TrendingArgs};

/// Storefront CLI - browse the catalog and manage products
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog with optional search, filters and sort
    Browse(BrowseArgs),

    /// Show details of one product from the listing
    Show(ShowArgs),

    /// Show the trending carousel
    Trending(TrendingArgs),

    /// Product administration
    Admin(AdminArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "storefront=debug,storefront_data=debug,storefront_ui=debug,storefront_cache=debug,storefront_catalog=debug"
    } else {
        "storefront=info,storefront_data=warn,storefront_ui=warn,storefront_cache=warn"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Browse(args) => commands::browse::run(args, &ctx).await,
        Commands::Show(args) => commands::browse::show(args, &ctx).await,
        Commands::Trending(args) => commands::trending::run(args, &ctx).await,
        Commands::Admin(args) => commands::admin::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
