//! Settings commands: locate, show and initialize the settings file

use std::path::Path;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use nook_core::Config;

use crate::cli::ConfigCommands;

const REDACTED: &str = "********";

pub fn execute(config: &Config, config_path: &Path, command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Path => println!("{}", config_path.display()),
        ConfigCommands::Show => print!("{}", render(config)?),
        ConfigCommands::Init { force } => {
            init(config_path, *force)?;
            println!("{} {}", "✓ Wrote".green(), config_path.display());
        },
    }
    Ok(())
}

/// Effective settings as TOML with the secret masked.
fn render(config: &Config) -> Result<String> {
    let mut shown = config.clone();
    if shown.api.secret.is_some() {
        shown.api.secret = Some(REDACTED.to_string());
    }
    Ok(toml::to_string_pretty(&shown)?)
}

/// Write default settings to `path`. Environment overrides are not persisted.
fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists. Pass --force to overwrite it.",
            path.display()
        );
    }
    Config::default()
        .save_to(path)
        .with_context(|| format!("Failed to write settings to {}", path.display()))
}
