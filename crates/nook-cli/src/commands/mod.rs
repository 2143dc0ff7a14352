//! Command implementations for the nook CLI
//!
//! Each command lives in its own submodule. Commands that read pages work from
//! the saved snapshot; only `refresh` talks to the search endpoint.

mod clear;
mod config;
mod icons;
mod list;
mod refresh;

pub use clear::run as clear_all;
pub use config::execute as manage_config;
pub use icons::execute as manage_icons;
pub use list::{find as find_pages, list as list_pages};
pub use refresh::execute as refresh;

use anyhow::{Context, Result};
use nook_core::{Config, Snapshot, Storage};

/// Open the data directory named by `config`.
fn open_storage(config: &Config) -> Result<Storage> {
    Storage::with_root(&config.paths.data_dir).with_context(|| {
        format!(
            "Failed to open data directory {}",
            config.paths.data_dir.display()
        )
    })
}

/// Load the saved snapshot, or `None` when nothing has been refreshed yet.
fn saved_snapshot(config: &Config) -> Result<Option<Snapshot>> {
    Ok(open_storage(config)?.load_snapshot()?)
}
