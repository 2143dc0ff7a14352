//! Clear command implementation

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use nook_core::{Config, Storage, clear_icon_cache};

use super::open_storage;

/// Abstraction over the local state removed by the clear command.
pub trait ClearTarget {
    fn describe(&self) -> Vec<String>;
    fn clear(&self) -> Result<usize>;
}

/// The saved snapshot plus the icon cache directory.
pub struct LocalState {
    storage: Storage,
    icons_dir: PathBuf,
}

impl ClearTarget for LocalState {
    fn describe(&self) -> Vec<String> {
        let mut items = Vec::new();
        let snapshot = self.storage.snapshot_path();
        if snapshot.exists() {
            items.push(snapshot.display().to_string());
        }
        let has_icons = std::fs::read_dir(&self.icons_dir)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);
        if has_icons {
            items.push(self.icons_dir.display().to_string());
        }
        items
    }

    fn clear(&self) -> Result<usize> {
        self.storage.clear_snapshot()?;
        Ok(clear_icon_cache(&self.icons_dir)?)
    }
}

/// High-level outcome produced by [`execute_clear`].
#[derive(Debug, PartialEq, Eq)]
pub enum ClearOutcome {
    AlreadyEmpty,
    Cancelled,
    Cleared { icons: usize },
}

/// Core clear implementation with injectable dependencies.
pub fn execute_clear<T, W, C>(
    target: &T,
    mut writer: W,
    force: bool,
    mut confirm: C,
) -> Result<ClearOutcome>
where
    T: ClearTarget,
    W: Write,
    C: FnMut() -> Result<bool>,
{
    let items = target.describe();
    if items.is_empty() {
        writeln!(writer, "{} Nothing to clear", "ℹ".blue())?;
        return Ok(ClearOutcome::AlreadyEmpty);
    }

    writeln!(writer, "{} This will permanently delete:", "⚠".yellow())?;
    for item in &items {
        writeln!(writer, "  • {item}")?;
    }
    writeln!(writer)?;

    if !force && !confirm()? {
        writeln!(writer, "{} Cancelled", "✗".red())?;
        return Ok(ClearOutcome::Cancelled);
    }

    let icons = target.clear()?;
    writeln!(
        writer,
        "{} Cleared saved pages and {} icon(s). Run 'nook refresh' to start over.",
        "✓".green(),
        icons
    )?;
    Ok(ClearOutcome::Cleared { icons })
}

/// Clears the saved pages and icons using the real filesystem and terminal IO.
pub fn run(config: &Config, force: bool) -> Result<()> {
    let target = LocalState {
        storage: open_storage(config)?,
        icons_dir: config.icons_dir(),
    };
    let stdout = io::stdout();
    let mut input = String::new();

    execute_clear(&target, stdout.lock(), force, || {
        let mut prompt = io::stdout().lock();
        write!(prompt, "Are you sure you want to continue? [y/N] ")?;
        prompt.flush()?;

        input.clear();
        io::stdin().read_line(&mut input)?;
        Ok(matches!(
            input.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    })?;
    Ok(())
}
