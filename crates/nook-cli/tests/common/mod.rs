#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// Isolated data and config locations for one test.
#[allow(dead_code)]
pub struct Sandbox {
    pub root: TempDir,
}

#[allow(dead_code)]
impl Sandbox {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("failed to create sandbox dir"),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.path().join("data")
    }

    pub fn icons_dir(&self) -> PathBuf {
        self.data_dir().join("icons")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.path().join("config.toml")
    }

    /// Write a settings file pointing the search endpoint at `server_uri`.
    pub fn write_config(&self, server_uri: &str, extra: &str) {
        let content = format!(
            "[api]\nendpoint = \"{server_uri}/v1/search\"\ntimeout_secs = 5\n{extra}\n"
        );
        std::fs::write(self.config_path(), content).expect("failed to write config");
    }

    /// A `nook` command bound to this sandbox.
    pub fn cmd(&self) -> Command {
        let mut cmd = nook_cmd();
        cmd.env("NOOK_DATA_DIR", self.data_dir());
        cmd.env("NOOK_CONFIG", self.config_path());
        cmd
    }
}

/// Create a `nook` command suitable for integration tests.
#[allow(dead_code)]
pub fn nook_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nook"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env_remove("NOOK_OUTPUT_FORMAT");
    cmd.env("NOOK_NOTION_SECRET", "secret_test");
    cmd.env("NO_COLOR", "1");
    cmd
}

#[allow(dead_code)]
pub fn database(id: &str, title: &str) -> Value {
    json!({
        "object": "database",
        "id": id,
        "url": format!("https://www.notion.so/{id}"),
        "title": [{"text": {"content": title}}],
        "icon": null,
        "parent": {"type": "workspace", "workspace": true},
    })
}

#[allow(dead_code)]
pub fn page(id: &str, title: &str, parent_db: &str, icon_url: Option<&str>) -> Value {
    let icon = icon_url.map_or(Value::Null, |url| {
        json!({"type": "external", "external": {"url": url}})
    });
    json!({
        "object": "page",
        "id": id,
        "url": format!("https://www.notion.so/{id}"),
        "properties": {
            "Name": {"type": "title", "title": [{"plain_text": title}]}
        },
        "icon": icon,
        "parent": {"type": "database_id", "database_id": parent_db},
    })
}

#[allow(dead_code)]
pub fn search_body(results: Vec<Value>) -> Value {
    json!({"object": "list", "results": results, "has_more": false, "next_cursor": null})
}

#[allow(dead_code)]
pub fn read_snapshot(data_dir: &Path) -> Value {
    let text = std::fs::read_to_string(data_dir.join("pages.json")).expect("snapshot missing");
    serde_json::from_str(&text).expect("snapshot is not JSON")
}
