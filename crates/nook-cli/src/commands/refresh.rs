//! Refresh command implementation

use anyhow::{Result, anyhow};
use colored::Colorize;
use nook_core::{
    Config, IconSyncReport, PageIndex, RefreshMode, RefreshOutcome, SearchOptions, sync_icons,
};
use tracing::warn;

use super::open_storage;
use crate::cli::RefreshArgs;
use crate::output::write_pages;

/// Search the workspace, persist the page list, then reconcile the icon cache.
///
/// A failed search keeps the previously saved list and exits with an error
/// without touching the icon cache.
pub async fn execute(config: &Config, args: &RefreshArgs, quiet: bool) -> Result<()> {
    let client = config.client()?;
    let storage = open_storage(config)?;
    let options = SearchOptions {
        skip_untitled: args.skip_untitled.unwrap_or(config.search.skip_untitled),
        match_parents: args.match_parents.unwrap_or(config.search.match_parents),
    };
    let mode = if args.cached {
        RefreshMode::Cached
    } else {
        RefreshMode::Live
    };

    let mut index = match storage.load_snapshot() {
        Ok(Some(snapshot)) => PageIndex::from_snapshot(snapshot),
        Ok(None) => PageIndex::new(),
        Err(e) => {
            warn!("Starting from an empty list: {}", e);
            PageIndex::new()
        },
    };

    // Status lines would corrupt piped page output
    let chatty = !quiet && args.format.format.is_none();

    match index.refresh(&client, &storage, options, mode).await {
        RefreshOutcome::Fetched { pages, elapsed } => {
            if chatty {
                println!(
                    "{} {} page(s) in {:.2}s",
                    "✓ Refreshed".green(),
                    pages,
                    elapsed.as_secs_f64()
                );
            }
        },
        RefreshOutcome::Cached { pages } => {
            if chatty {
                println!("{} {} saved page(s)", "✓ Using".green(), pages);
            }
        },
        RefreshOutcome::Failed { kept, error } => {
            return Err(anyhow!(error).context(format!(
                "Refresh failed; the previous {kept} page(s) were kept"
            )));
        },
    }

    if !args.no_icons {
        let report =
            sync_icons(&config.icons_dir(), index.pages(), args.force_icons, &client).await?;
        if chatty {
            print_icon_report(&report);
        }
    }

    if args.format.format.is_some() {
        let stdout = std::io::stdout();
        write_pages(&mut stdout.lock(), index.pages(), args.format.resolve())?;
    }

    Ok(())
}

pub(super) fn print_icon_report(report: &IconSyncReport) {
    println!(
        "{} {} downloaded, {} cached, {} removed",
        "✓ Icons".green(),
        report.downloaded,
        report.skipped,
        report.removed
    );
    if report.failed > 0 {
        println!(
            "{} {} icon(s) could not be downloaded",
            "⚠".yellow(),
            report.failed
        );
    }
}
