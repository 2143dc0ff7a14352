use crate::{Error, Result, Snapshot};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const SNAPSHOT_FILE: &str = "pages.json";

/// Local filesystem storage for the last good record set
pub struct Storage {
    root_dir: PathBuf,
}

impl Storage {
    /// Creates storage rooted at `root_dir`, creating the directory if needed
    pub fn with_root(root_dir: impl Into<PathBuf>) -> Result<Self> {
        let root_dir = root_dir.into();
        fs::create_dir_all(&root_dir)
            .map_err(|e| Error::Storage(format!("Failed to create data directory: {e}")))?;
        Ok(Self { root_dir })
    }

    /// Returns the root data directory path
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Path of the persisted snapshot
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.root_dir.join(SNAPSHOT_FILE)
    }

    /// Persists a snapshot atomically
    pub fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let path = self.snapshot_path();
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| Error::Storage(format!("Failed to serialize snapshot: {e}")))?;

        // Write to a temp file first to ensure atomicity
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, &json)
            .map_err(|e| Error::Storage(format!("Failed to write temp snapshot: {e}")))?;

        #[cfg(target_os = "windows")]
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| Error::Storage(format!("Failed to remove existing snapshot: {e}")))?;
        }
        fs::rename(&tmp_path, &path)
            .map_err(|e| Error::Storage(format!("Failed to persist snapshot: {e}")))?;

        debug!(
            "Saved snapshot with {} page(s) to {}",
            snapshot.pages.len(),
            path.display()
        );
        Ok(())
    }

    /// Loads the snapshot if one has been saved
    pub fn load_snapshot(&self) -> Result<Option<Snapshot>> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| Error::Storage(format!("Failed to read snapshot: {e}")))?;
        let snapshot = serde_json::from_str(&json)
            .map_err(|e| Error::Storage(format!("Failed to parse snapshot: {e}")))?;
        Ok(Some(snapshot))
    }

    /// Deletes the snapshot, forcing the next cached refresh to go live
    pub fn clear_snapshot(&self) -> Result<()> {
        let path = self.snapshot_path();
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| Error::Storage(format!("Failed to remove snapshot: {e}")))?;
        }
        Ok(())
    }
}
