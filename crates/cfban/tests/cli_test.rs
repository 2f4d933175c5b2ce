//! Integration tests for the `cfban` binary.
//!
//! Every test builds its own fail2ban configuration in a temp directory and
//! points the binary at it through `CFBAN_*` variables, so nothing under
//! /etc/fail2ban or /tmp is touched.
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// A fail2ban installation: config files, PID file, log file, state dir.
struct Install {
    root: TempDir,
}

impl Install {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let install = Self { root };
        fs::create_dir_all(install.config_dir()).unwrap();
        fs::create_dir_all(install.state_dir()).unwrap();
        install.write_config(
            "fail2ban.conf",
            &format!(
                "[Definition]\nlogtarget = {}\npidfile = {}\n",
                install.log_file().display(),
                install.pid_file().display()
            ),
        );
        install.write_config(
            "jail.conf",
            "[DEFAULT]\ncftoken = \"test-token\"\ncfaccount = acc-1\ncfzone = zone-1\n",
        );
        fs::write(install.pid_file(), "4711\n").unwrap();
        install
    }

    fn config_dir(&self) -> PathBuf {
        self.root.path().join("etc")
    }

    fn state_dir(&self) -> PathBuf {
        self.root.path().join("state")
    }

    fn log_file(&self) -> PathBuf {
        self.root.path().join("fail2ban.log")
    }

    fn pid_file(&self) -> PathBuf {
        self.root.path().join("fail2ban.pid")
    }

    fn write_config(&self, name: &str, contents: &str) {
        fs::write(self.config_dir().join(name), contents).unwrap();
    }

    fn log(&self) -> String {
        fs::read_to_string(self.log_file()).unwrap_or_default()
    }

    fn cmd(&self, api_url: &str) -> assert_cmd::Command {
        cfban_cmd(&self.config_dir(), &self.state_dir(), api_url)
    }
}

/// Build a [`Command`] for the `cfban` binary with env isolation.
fn cfban_cmd(config_dir: &Path, state_dir: &Path, api_url: &str) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("cfban");
    cmd.env("CFBAN_CONFIG_DIR", config_dir)
        .env("CFBAN_STATE_DIR", state_dir)
        .env("CFBAN_API_URL", api_url)
        .env_remove("CFBAN_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

/// Nothing listens here; tests that must not reach the network use it.
const DEAD_API: &str = "http://127.0.0.1:1/client/v4/";

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": result,
    }))
}

// ── Usage ───────────────────────────────────────────────────────────

#[test]
fn test_no_args_shows_usage() {
    let install = Install::new();
    let output = install.cmd(DEAD_API).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_version_flag() {
    let install = Install::new();
    install
        .cmd(DEAD_API)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cfban"));
}

#[test]
fn test_unknown_action_is_usage_error() {
    let install = Install::new();
    install
        .cmd(DEAD_API)
        .arg("restart")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value 'restart'"));
}

#[test]
fn test_ban_requires_target() {
    let install = Install::new();
    install.cmd(DEAD_API).arg("ban").assert().code(2);
    install.cmd(DEAD_API).arg("unban").assert().code(2);
}

#[test]
fn test_malformed_target_is_usage_error() {
    let install = Install::new();
    install
        .cmd(DEAD_API)
        .args(["ban", "not-an-address"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid target 'not-an-address'"));
    assert!(install.log().contains("CRITICAL[cloudflare] Invalid target"));
}

#[test]
fn test_ipv6_target_is_logged_and_skipped() {
    let install = Install::new();
    install
        .cmd(DEAD_API)
        .args(["ban", "2001:db8::1"])
        .assert()
        .success();
    assert!(
        install
            .log()
            .contains("ERROR   [cloudflare] IPv6 is not supported, ignoring 2001:db8::1")
    );
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_missing_config_dir_is_config_error() {
    let state = TempDir::new().unwrap();
    cfban_cmd(Path::new("/nonexistent/cfban-test"), state.path(), DEAD_API)
        .arg("start")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("could not be found"));
}

#[test]
fn test_missing_credential_is_config_error() {
    let install = Install::new();
    install.write_config("jail.conf", "cfaccount = acc-1\ncfzone = zone-1\n");

    install.cmd(DEAD_API).arg("start").assert().code(3);
    assert!(
        install
            .log()
            .contains("CRITICAL[cloudflare] could not find config value 'cftoken' in 'jail.conf'")
    );
}

#[test]
fn test_local_file_overrides_credentials() {
    let install = Install::new();
    install.write_config("jail.conf", "cfaccount = acc-1\ncfzone = zone-1\n");
    install.write_config("jail.local", "cftoken = from-local\n");

    install
        .cmd(DEAD_API)
        .arg("permission-test")
        .assert()
        .success();
}

#[test]
fn test_unreadable_pid_file_is_config_error() {
    let install = Install::new();
    fs::remove_file(install.pid_file()).unwrap();

    install.cmd(DEAD_API).arg("setup").assert().code(3);
    let log = install.log();
    assert!(log.contains("[?]: CRITICAL[cloudflare] invalid PID file"), "log was:\n{log}");
}

// ── Actions ─────────────────────────────────────────────────────────

#[test]
fn test_permission_test_logs_warnings() {
    let install = Install::new();
    install
        .cmd(DEAD_API)
        .arg("permission-test")
        .assert()
        .success();

    let log = install.log();
    assert!(log.contains("fail2ban.actions        [4711]: WARNING [cloudflare] permission-test is currently not implemented"));
    assert!(log.contains("please check your permissions according to the install manual"));
}

#[test]
fn test_unreachable_provider_still_exits_zero() {
    let install = Install::new();
    fs::write(install.state_dir().join("fail2ban-list.id"), "list-1").unwrap();

    install
        .cmd(DEAD_API)
        .args(["ban", "203.0.113.5"])
        .assert()
        .success();
    assert!(install.log().contains("Transport failure, provider unreachable"));
}

#[tokio::test]
async fn test_ban_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/client/v4/accounts/acc-1/rules/lists/list-1/items"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!([{ "ip": "203.0.113.5" }])))
        .respond_with(ok(json!({ "operation_id": "op-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let install = Install::new();
    fs::write(install.state_dir().join("fail2ban-list.id"), "list-1").unwrap();
    let mut cmd = install.cmd(&format!("{}/client/v4/", server.uri()));
    cmd.args(["ban", "203.0.113.5"]);

    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(0), "{}", combined_output(&output));
    assert!(install.log().contains("INFO    [cloudflare] Banned 203.0.113.5"));
}

#[tokio::test]
async fn test_stop_end_to_end_clears_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/client/v4/zones/zone-1/firewall/rules"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/client/v4/zones/zone-1/filters"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/client/v4/accounts/acc-1/rules/lists"))
        .respond_with(ok(json!([{ "id": "list-1", "name": "fail2ban", "kind": "ip" }])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/client/v4/accounts/acc-1/rules/lists/list-1"))
        .respond_with(ok(json!({ "id": "list-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let install = Install::new();
    let cache = install.state_dir().join("fail2ban-list.id");
    fs::write(&cache, "list-1").unwrap();
    let mut cmd = install.cmd(&format!("{}/client/v4/", server.uri()));
    cmd.arg("stop");

    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(0), "{}", combined_output(&output));
    assert!(!cache.exists());
    let log = install.log();
    assert!(log.contains("INFO    [cloudflare] Cloudflare API stop"));
    assert!(log.contains("Fail2ban list successfully deleted."));
}
