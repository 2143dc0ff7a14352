//! # nook-core
//!
//! Core functionality for nook - a local, searchable index of the pages and
//! databases in a Notion workspace, with an on-disk cache of their icons.
//!
//! ## Architecture
//!
//! - **Client**: paginates the workspace search endpoint to completion
//! - **Normalization**: turns page and database results into uniform [`PageRecord`]s
//! - **Parents**: resolves each record's parent display name from the record set
//! - **Icons**: keeps a cache directory in step with the records' icons
//! - **Refresh**: holds the last good record list and persists it between runs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nook_core::{Config, IconCache, SearchOptions, search};
//!
//! # async fn run() -> nook_core::Result<()> {
//! let config = Config::load()?;
//! let client = config.client()?;
//!
//! let pages = search(&client, SearchOptions { skip_untitled: true, match_parents: true }).await?;
//! for page in &pages {
//!     println!("{} -> {}", page.label(), page.url);
//! }
//!
//! let icons = IconCache::open(config.icons_dir())?;
//! icons.sync(&pages, false, &client).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`]. Only whole-operation failures
//! surface as errors: a malformed search result or a failed icon download is
//! logged and skipped.

/// Search endpoint client
pub mod client;
/// Configuration management
pub mod config;
/// Error types and result aliases
pub mod error;
/// Icon cache reconciliation
pub mod icons;
pub mod normalize;
/// Parent-name resolution and untitled filtering
pub mod parents;
pub mod refresh;
/// The search-and-normalize pipeline entry point
pub mod search;
/// Snapshot persistence
pub mod storage;
/// Core data types
pub mod types;

pub use client::NotionClient;
pub use config::{ApiConfig, Config, PathsConfig};
pub use error::{Error, Result};
pub use icons::{IconCache, IconSource, IconSyncReport, clear_icon_cache, sync_icons};
pub use refresh::{PageIndex, RefreshMode, RefreshOutcome, SnapshotStore};
pub use search::{SearchOptions, search};
pub use storage::Storage;
pub use types::*;
