//! Configuration management for nook.
//!
//! Settings live in a single TOML file in the platform config directory. Every
//! section is optional; missing values fall back to defaults. Two environment
//! variables take precedence over the file:
//!
//! - `NOOK_NOTION_SECRET`: integration secret
//! - `NOOK_DATA_DIR`: data directory holding the snapshot and icon cache
//!
//! `NOOK_CONFIG` selects a different settings file.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [api]
//! secret = "secret_..."
//! timeout_secs = 30
//!
//! [search]
//! match_parents = true
//! skip_untitled = false
//!
//! [paths]
//! data_dir = "/home/user/.local/share/nook"
//! ```
//!
//! ```rust
//! use nook_core::Config;
//!
//! let config: Config = toml::from_str("[search]\nmatch_parents = true\n")?;
//! assert!(config.search.match_parents);
//! assert_eq!(config.api.timeout_secs, 30);
//! # Ok::<(), toml::de::Error>(())
//! ```

use crate::client::{DEFAULT_NOTION_VERSION, DEFAULT_SEARCH_URL};
use crate::{Error, NotionClient, Result, SearchOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "config.toml";
const ENV_CONFIG: &str = "NOOK_CONFIG";
const ENV_SECRET: &str = "NOOK_NOTION_SECRET";
const ENV_DATA_DIR: &str = "NOOK_DATA_DIR";

/// Settings for the search pipeline and local cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Search API connection settings
    pub api: ApiConfig,
    /// Record post-processing switches
    pub search: SearchOptions,
    /// Local storage locations
    pub paths: PathsConfig,
}

/// Search API connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Integration secret sent as a bearer token.
    pub secret: Option<String>,
    /// Search endpoint URL.
    pub endpoint: String,
    /// Value of the `Notion-Version` header.
    pub notion_version: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            secret: None,
            endpoint: DEFAULT_SEARCH_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Local storage locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory for the page snapshot and, by default, the icon cache.
    pub data_dir: PathBuf,
    /// Icon cache directory; defaults to `<data_dir>/icons`.
    pub icons_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: project_dirs().map_or_else(
                || {
                    directories::BaseDirs::new().map_or_else(
                        || PathBuf::from(".nook"),
                        |base| base.home_dir().join(".nook"),
                    )
                },
                |dirs| dirs.data_dir().to_path_buf(),
            ),
            icons_dir: None,
        }
    }
}

impl Config {
    /// Load settings from the default location, applying environment overrides.
    ///
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load settings from an explicit file without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Write settings as pretty TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Config("Invalid config path".into()))?;
        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;
        fs::write(path, content).map_err(|e| Error::Config(format!("Failed to write config: {e}")))
    }

    /// Path of the settings file: `NOOK_CONFIG`, else the platform config dir.
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(ENV_CONFIG) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        let dirs = project_dirs()
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))?;
        Ok(dirs.config_dir().join(CONFIG_FILE))
    }

    /// Apply `NOOK_NOTION_SECRET` and `NOOK_DATA_DIR` from `lookup`; blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(secret) = non_blank(ENV_SECRET) {
            self.api.secret = Some(secret.trim().to_string());
        }
        if let Some(dir) = non_blank(ENV_DATA_DIR) {
            self.paths.data_dir = PathBuf::from(dir.trim());
        }
    }

    /// The configured secret, or a configuration error when none is set.
    pub fn secret(&self) -> Result<&str> {
        self.api
            .secret
            .as_deref()
            .map(str::trim)
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| {
                Error::Config(format!(
                    "No Notion secret configured. Set api.secret in the config file or {ENV_SECRET}"
                ))
            })
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Icon cache directory.
    #[must_use]
    pub fn icons_dir(&self) -> PathBuf {
        self.paths
            .icons_dir
            .clone()
            .unwrap_or_else(|| self.paths.data_dir.join("icons"))
    }

    /// Build a search client from these settings.
    pub fn client(&self) -> Result<NotionClient> {
        Ok(NotionClient::with_timeout(self.secret()?, self.timeout())?
            .with_endpoint(self.api.endpoint.clone())
            .with_notion_version(self.api.notion_version.clone()))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "nook", "nook")
}
