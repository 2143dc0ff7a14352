//! nook CLI - local index of the pages in a Notion workspace
//!
//! This is the main entry point for the nook command-line interface.
//! Command implementations live in separate modules.

use anyhow::{Context, Result};
use clap::Parser;
use nook_core::Config;

mod cli;
mod commands;
mod logging;
mod output;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::initialize_logging(&cli)?;

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    let mut config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load settings from {}", config_path.display()))?;
    config.apply_overrides(|key| std::env::var(key).ok());

    execute_command(cli, &config, &config_path).await
}

async fn execute_command(cli: Cli, config: &Config, config_path: &std::path::Path) -> Result<()> {
    match cli.command {
        Commands::Refresh(args) => commands::refresh(config, &args, cli.quiet).await,
        Commands::List { format } => commands::list_pages(config, format.resolve()),
        Commands::Find { query, format } => commands::find_pages(config, &query, format.resolve()),
        Commands::Clear { force } => commands::clear_all(config, force),
        Commands::Icons { command } => commands::manage_icons(config, &command, cli.quiet).await,
        Commands::Config { command } => commands::manage_config(config, config_path, &command),
    }
}
