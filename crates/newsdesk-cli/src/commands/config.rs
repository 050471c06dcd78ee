use anyhow::{Context, Result};
use colored::Colorize;
use newsdesk_core::i18n::MessageKey;

use crate::app::AppContext;

/// Prints the effective configuration (file, environment and flags merged).
pub fn show(ctx: &AppContext) -> Result<()> {
    let rendered =
        toml::to_string_pretty(&ctx.config).context("Failed to render configuration")?;

    println!(
        "{}",
        format!("# {}", ctx.paths.config_file().display()).bright_black()
    );
    print!("{rendered}");
    Ok(())
}

pub fn set(ctx: &AppContext, key: &str, value: &str) -> Result<()> {
    ctx.config_service.set_value(key, value)?;
    println!(
        "{} {}: {} = {}",
        "✓".green(),
        ctx.text(MessageKey::CommonSuccess),
        key,
        value
    );
    Ok(())
}
