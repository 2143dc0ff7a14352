#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::{Sandbox, database, page, search_body};
use nook_core::normalize::icon_file_name;
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve_icon(server: &MockServer, name: &str, expected_hits: u64) -> String {
    Mock::given(method("GET"))
        .and(path(format!("/icons/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(name.as_bytes().to_vec()))
        .expect(expected_hits)
        .mount(server)
        .await;
    format!("{}/icons/{name}", server.uri())
}

async fn serve_search(server: &MockServer, icon_url: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![
            database("db1", "Product"),
            page("p1", "Roadmap", "db1", Some(icon_url)),
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn icon_sync_fills_gaps_and_prunes_orphans() -> Result<()> {
    let server = MockServer::start().await;
    // one download during refresh, one after the file is deleted
    let icon_url = serve_icon(&server, "a.png", 2).await;
    serve_search(&server, &icon_url).await;
    let sandbox = Sandbox::new();
    sandbox.write_config(&server.uri(), "");

    sandbox.cmd().arg("refresh").assert().success();
    let icon = sandbox.icons_dir().join(icon_file_name(&icon_url));
    assert!(icon.is_file());

    let orphan = sandbox.icons_dir().join("stale.png");
    std::fs::write(&orphan, b"old")?;
    std::fs::remove_file(&icon)?;

    sandbox
        .cmd()
        .args(["icons", "sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 downloaded, 0 cached, 1 removed"));

    assert!(icon.is_file());
    assert!(!orphan.exists());
    Ok(())
}

#[tokio::test]
async fn forced_icon_sync_downloads_again() -> Result<()> {
    let server = MockServer::start().await;
    let icon_url = serve_icon(&server, "b.png", 2).await;
    serve_search(&server, &icon_url).await;
    let sandbox = Sandbox::new();
    sandbox.write_config(&server.uri(), "");

    sandbox.cmd().arg("refresh").assert().success();
    sandbox
        .cmd()
        .args(["icons", "sync", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 downloaded"));
    Ok(())
}

#[tokio::test]
async fn broken_icon_does_not_fail_refresh() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    serve_search(&server, &format!("{}/icons/missing.png", server.uri())).await;
    let sandbox = Sandbox::new();
    sandbox.write_config(&server.uri(), "");

    sandbox
        .cmd()
        .arg("refresh")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 icon(s) could not be downloaded"));
    Ok(())
}

#[test]
fn icons_clear_empties_the_cache() -> Result<()> {
    let sandbox = Sandbox::new();
    std::fs::create_dir_all(sandbox.icons_dir())?;
    std::fs::write(sandbox.icons_dir().join("one.png"), b"1")?;
    std::fs::write(sandbox.icons_dir().join("two.ico"), b"2")?;

    sandbox
        .cmd()
        .args(["icons", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 cached icon(s)"));

    assert_eq!(std::fs::read_dir(sandbox.icons_dir())?.count(), 0);
    Ok(())
}

#[tokio::test]
async fn clear_removes_pages_and_icons() -> Result<()> {
    let server = MockServer::start().await;
    let icon_url = serve_icon(&server, "c.png", 1).await;
    serve_search(&server, &icon_url).await;
    let sandbox = Sandbox::new();
    sandbox.write_config(&server.uri(), "");
    sandbox.cmd().arg("refresh").assert().success();

    sandbox
        .cmd()
        .args(["clear", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared saved pages and 1 icon(s)"));

    assert!(!sandbox.data_dir().join("pages.json").exists());
    sandbox
        .cmd()
        .args(["clear", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to clear"));
    Ok(())
}

#[test]
fn clear_declined_keeps_everything() -> Result<()> {
    let sandbox = Sandbox::new();
    std::fs::create_dir_all(sandbox.data_dir())?;
    std::fs::write(
        sandbox.data_dir().join("pages.json"),
        r#"{"fetched_at":"2024-01-01T00:00:00Z","pages":[]}"#,
    )?;

    sandbox
        .cmd()
        .arg("clear")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));

    assert!(sandbox.data_dir().join("pages.json").exists());
    Ok(())
}

#[test]
fn config_show_redacts_secret() {
    let sandbox = Sandbox::new();
    sandbox.write_config("http://127.0.0.1:9", "[search]\nskip_untitled = true\n");

    sandbox
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skip_untitled = true"))
        .stdout(predicate::str::contains("http://127.0.0.1:9/v1/search"))
        .stdout(predicate::str::contains("secret_test").not());
}

#[test]
fn config_path_honors_flag() {
    let sandbox = Sandbox::new();
    let custom = sandbox.root.path().join("elsewhere.toml");

    sandbox
        .cmd()
        .args(["config", "path", "--config"])
        .arg(&custom)
        .assert()
        .success()
        .stdout(predicate::str::contains("elsewhere.toml"));
}

#[test]
fn malformed_config_is_reported() -> Result<()> {
    let sandbox = Sandbox::new();
    std::fs::write(sandbox.config_path(), "[api\nsecret = ")?;

    sandbox
        .cmd()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load settings"));
    Ok(())
}

#[test]
fn icon_sync_without_saved_pages_keeps_the_cache() -> Result<()> {
    let sandbox = Sandbox::new();
    std::fs::create_dir_all(sandbox.icons_dir())?;
    let cached = sandbox.icons_dir().join("kept.png");
    std::fs::write(&cached, b"1")?;

    sandbox
        .cmd()
        .args(["icons", "sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No pages saved yet"));

    assert!(cached.is_file());
    Ok(())
}

#[test]
fn config_init_writes_defaults_once() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));
    let written = std::fs::read_to_string(sandbox.config_path()).expect("settings written");
    assert!(written.contains("[search]"));
    assert!(!written.contains("secret_test"));

    sandbox
        .cmd()
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    sandbox
        .cmd()
        .args(["config", "init", "--force"])
        .assert()
        .success();
}
