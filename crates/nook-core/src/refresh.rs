//! Refresh orchestration shared by the CLI and other consumers.
//!
//! [`PageIndex`] holds the last good record list. A refresh either reuses the
//! persisted snapshot ([`RefreshMode::Cached`]) or runs a live search
//! ([`RefreshMode::Live`]). A failed live search keeps the previous list.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::{Error, NotionClient, PageRecord, Result, SearchOptions, Snapshot, Storage, search};

/// Abstraction over snapshot persistence used by refresh routines.
pub trait SnapshotStore {
    /// Load the last persisted snapshot, if any.
    fn load_snapshot(&self) -> Result<Option<Snapshot>>;
    /// Persist a snapshot, replacing the previous one.
    fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()>;
}

impl SnapshotStore for Storage {
    fn load_snapshot(&self) -> Result<Option<Snapshot>> {
        Self::load_snapshot(self)
    }

    fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        Self::save_snapshot(self, snapshot)
    }
}

/// Whether a refresh may reuse the persisted snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Use the persisted snapshot when present; search live otherwise.
    Cached,
    /// Always search live.
    Live,
}

/// Result summary for a refresh operation.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// A live search replaced the record list.
    Fetched {
        /// Number of records now held.
        pages: usize,
        /// Wall time spent searching.
        elapsed: Duration,
    },
    /// The persisted snapshot was loaded.
    Cached {
        /// Number of records now held.
        pages: usize,
    },
    /// The live search failed and the previous list was kept.
    Failed {
        /// Number of records still held.
        kept: usize,
        /// Why the search failed.
        error: Error,
    },
}

impl RefreshOutcome {
    /// Whether the index holds a usable (possibly stale) list after this refresh.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// The current record list and when it was fetched.
#[derive(Debug, Clone, Default)]
pub struct PageIndex {
    pages: Vec<PageRecord>,
    fetched_at: Option<DateTime<Utc>>,
}

impl PageIndex {
    /// Empty index; nothing fetched yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index seeded from a persisted snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            pages: snapshot.pages,
            fetched_at: Some(snapshot.fetched_at),
        }
    }

    /// Current records.
    #[must_use]
    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    /// When the current records were fetched.
    #[must_use]
    pub const fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Refreshes the record list.
    ///
    /// In [`RefreshMode::Cached`] the persisted snapshot is used when it exists
    /// and loads cleanly. Otherwise a live search runs; on success the list is
    /// replaced and persisted, on failure the previous list is kept and the error
    /// is reported in the outcome. A snapshot that fails to save is logged; the
    /// fresh list is still used.
    pub async fn refresh<S>(
        &mut self,
        client: &NotionClient,
        store: &S,
        options: SearchOptions,
        mode: RefreshMode,
    ) -> RefreshOutcome
    where
        S: SnapshotStore + ?Sized,
    {
        if mode == RefreshMode::Cached {
            match store.load_snapshot() {
                Ok(Some(snapshot)) => {
                    *self = Self::from_snapshot(snapshot);
                    info!("Loaded {} page(s) from snapshot", self.pages.len());
                    return RefreshOutcome::Cached {
                        pages: self.pages.len(),
                    };
                },
                Ok(None) => info!("No snapshot yet; searching live"),
                Err(e) => warn!("Ignoring unreadable snapshot: {}", e),
            }
        }

        let start = Instant::now();
        match search(client, options).await {
            Ok(pages) => {
                let elapsed = start.elapsed();
                let snapshot = Snapshot {
                    fetched_at: Utc::now(),
                    pages,
                };
                if let Err(e) = store.save_snapshot(&snapshot) {
                    warn!("Failed to persist snapshot: {}", e);
                }
                *self = Self::from_snapshot(snapshot);
                info!(
                    "List of pages refreshed in {:.2} seconds",
                    elapsed.as_secs_f64()
                );
                RefreshOutcome::Fetched {
                    pages: self.pages.len(),
                    elapsed,
                }
            },
            Err(e) => {
                error!(
                    "Refresh failed ({}); keeping {} previous page(s): {}",
                    e.category(),
                    self.pages.len(),
                    e
                );
                RefreshOutcome::Failed {
                    kept: self.pages.len(),
                    error: e,
                }
            },
        }
    }
}
