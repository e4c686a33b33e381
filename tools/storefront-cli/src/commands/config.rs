//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;
    ctx.output.info("[feed]");
    ctx.output.kv("url", &config.feed.url);
    ctx.output.kv("timeout_ms", &config.feed.timeout_ms.to_string());

    ctx.output.info("[api]");
    ctx.output.kv("base_url", &config.api.base_url);
    ctx.output.kv("timeout_ms", &config.api.timeout_ms.to_string());

    ctx.output.info("[display]");
    ctx.output.kv("currency", config.display.currency.code());
    ctx.output.kv("placeholder", &config.display.placeholder);
    ctx.output.kv("description_limit", &config.display.description_limit.to_string());
    if let Some(contact) = &config.display.contact {
        ctx.output.kv("contact", &format!("{} <{}>", contact.label, contact.url));
    }

    ctx.output.info("[carousel]");
    ctx.output.kv("interval_ms", &config.carousel.interval_ms.to_string());
    ctx.output.kv("drag_threshold_px", &config.carousel.drag_threshold_px.to_string());
    ctx.output.kv(
        "breakpoints",
        &format!(
            "<{} → 1, <{} → 2, else 3",
            config.carousel.breakpoints.small, config.carousel.breakpoints.medium
        ),
    );

    ctx.output.info("[session]");
    ctx.output.kv("path", &ctx.session_path().display().to_string());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}
