//! Icon cache commands

use anyhow::{Context, Result};
use colored::Colorize;
use nook_core::{Config, NotionClient, clear_icon_cache, sync_icons};

use super::refresh::print_icon_report;
use super::saved_snapshot;
use crate::cli::IconCommands;

/// Run an icon cache subcommand against the saved page list.
pub async fn execute(config: &Config, command: &IconCommands, quiet: bool) -> Result<()> {
    let dir = config.icons_dir();
    match command {
        IconCommands::Sync { force } => {
            // Without a saved list every cached icon would look orphaned
            let Some(snapshot) = saved_snapshot(config)? else {
                if !quiet {
                    println!("No pages saved yet. Run 'nook refresh' first.");
                }
                return Ok(());
            };
            let pages = snapshot.pages;
            // Icon URLs are public or pre-signed; no secret needed
            let client = NotionClient::with_timeout(String::new(), config.timeout())?;
            let report = sync_icons(&dir, &pages, *force, &client)
                .await
                .with_context(|| format!("Failed to sync icons in {}", dir.display()))?;
            if !quiet {
                print_icon_report(&report);
            }
        },
        IconCommands::Clear => {
            let removed = clear_icon_cache(&dir)
                .with_context(|| format!("Failed to clear icons in {}", dir.display()))?;
            if !quiet {
                println!("{} {} cached icon(s)", "✓ Removed".green(), removed);
            }
        },
    }
    Ok(())
}
