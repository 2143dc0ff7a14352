//! Local icon cache kept consistent with the current record set.
//!
//! The cache directory holds one file per distinct `iconName`. A sync downloads
//! icons that are missing (or all of them when forced) and then removes every file
//! that no current record references. Staleness is derived purely from the
//! current records, never from a previous snapshot.

use crate::{Error, NotionClient, PageRecord, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where icon bytes come from.
#[async_trait]
pub trait IconSource: Send + Sync {
    /// Download the icon at `url`.
    async fn fetch_icon(&self, url: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl IconSource for NotionClient {
    async fn fetch_icon(&self, url: &str) -> Result<Vec<u8>> {
        Self::fetch_icon(self, url).await
    }
}

/// Counts from one [`IconCache::sync`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IconSyncReport {
    /// Icons downloaded and written.
    pub downloaded: usize,
    /// Icons already present and left alone.
    pub skipped: usize,
    /// Icons whose download failed; their records stay iconless.
    pub failed: usize,
    /// Orphaned files deleted.
    pub removed: usize,
}

/// Icon cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct IconCache {
    dir: PathBuf,
}

impl IconCache {
    /// Opens the cache, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            Error::Cache(format!(
                "Failed to create icon cache directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    /// Cache directory path
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record's cached icon, if it has one on disk
    #[must_use]
    pub fn icon_path(&self, record: &PageRecord) -> Option<PathBuf> {
        let path = self.dir.join(record.icon_name()?);
        path.is_file().then_some(path)
    }

    /// Reconciles the cache against `records`.
    ///
    /// Downloads each distinct icon that is missing, or every icon when `force`
    /// is set. A failed download or a failed write of one icon is logged and
    /// counted without stopping the pass. Afterwards every file not named by a
    /// record's `iconName` is removed. Failures to enumerate the directory or
    /// delete a stale icon abort the sync.
    pub async fn sync<S>(&self, records: &[PageRecord], force: bool, source: &S) -> Result<IconSyncReport>
    where
        S: IconSource + ?Sized,
    {
        let mut report = IconSyncReport::default();
        let mut referenced: HashSet<&str> = HashSet::new();

        for icon in records.iter().filter_map(|record| record.icon.as_ref()) {
            if !referenced.insert(icon.file_name.as_str()) {
                continue;
            }

            let path = self.dir.join(&icon.file_name);
            if !force && path.is_file() {
                report.skipped += 1;
                continue;
            }

            match source.fetch_icon(&icon.url).await {
                Ok(bytes) => match self.write_icon(&path, &bytes) {
                    Ok(()) => {
                        debug!("Cached icon {}", icon.file_name);
                        report.downloaded += 1;
                    },
                    Err(e) => {
                        warn!("Could not store {}: {}", icon.file_name, e);
                        report.failed += 1;
                    },
                },
                Err(e) => {
                    warn!("{} unavailable: {}", icon.url, e);
                    report.failed += 1;
                },
            }
        }

        report.removed = self.prune(&referenced)?;

        info!(
            "Icon cache synced: {} downloaded, {} kept, {} failed, {} removed",
            report.downloaded, report.skipped, report.failed, report.removed
        );
        Ok(report)
    }

    /// Removes everything in the cache directory; returns the number of entries removed
    pub fn clear_all(&self) -> Result<usize> {
        let mut removed = 0;
        for entry in self.entries()? {
            let path = entry.path();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let outcome = if is_dir {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            outcome.map_err(|e| {
                Error::Cache(format!("Failed to remove {}: {e}", path.display()))
            })?;
            removed += 1;
        }

        info!("Removed {} cached icon(s) from {}", removed, self.dir.display());
        Ok(removed)
    }

    fn prune(&self, referenced: &HashSet<&str>) -> Result<usize> {
        let mut removed = 0;
        for entry in self.entries()? {
            let is_file = entry.file_type().map(|t| !t.is_dir()).unwrap_or(false);
            if !is_file {
                continue;
            }

            let name = entry.file_name();
            if name.to_str().is_some_and(|name| referenced.contains(name)) {
                continue;
            }

            let path = entry.path();
            fs::remove_file(&path).map_err(|e| {
                Error::Cache(format!("Failed to remove stale icon {}: {e}", path.display()))
            })?;
            debug!("Removed stale icon {}", path.display());
            removed += 1;
        }
        Ok(removed)
    }

    fn entries(&self) -> Result<Vec<fs::DirEntry>> {
        let read_dir = fs::read_dir(&self.dir).map_err(|e| {
            Error::Cache(format!("Failed to read {}: {e}", self.dir.display()))
        })?;
        read_dir
            .map(|entry| {
                entry.map_err(|e| {
                    Error::Cache(format!("Failed to read {}: {e}", self.dir.display()))
                })
            })
            .collect()
    }

    fn write_icon(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::Cache(format!("Invalid icon path {}", path.display())))?;

        // Write to a temp file first so a failed write never leaves a truncated icon
        let tmp_path = self.dir.join(format!("{file_name}.part"));
        fs::write(&tmp_path, bytes)
            .map_err(|e| Error::Cache(format!("Failed to write {}: {e}", tmp_path.display())))?;

        #[cfg(target_os = "windows")]
        if path.exists() {
            fs::remove_file(path).map_err(|e| {
                Error::Cache(format!("Failed to replace {}: {e}", path.display()))
            })?;
        }
        fs::rename(&tmp_path, path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            Error::Cache(format!("Failed to persist {}: {e}", path.display()))
        })
    }
}

/// Reconciles the icon cache at `cache_dir` against `records`.
pub async fn sync_icons<S>(
    cache_dir: &Path,
    records: &[PageRecord],
    force: bool,
    source: &S,
) -> Result<IconSyncReport>
where
    S: IconSource + ?Sized,
{
    IconCache::open(cache_dir)?.sync(records, force, source).await
}

/// Empties the icon cache at `cache_dir`.
pub fn clear_icon_cache(cache_dir: &Path) -> Result<usize> {
    IconCache::open(cache_dir)?.clear_all()
}
