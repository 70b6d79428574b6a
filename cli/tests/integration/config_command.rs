//! Integration tests for `kitchen config`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn kitchen() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kitchen"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("config.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

// ---------------------------------------------------------------------------
// `kitchen config path`
// ---------------------------------------------------------------------------

#[test]
fn test_config_path_follows_env_var() {
    let (_dir, path) = temp_config_path();
    kitchen()
        .args(["config", "path"])
        .env("KITCHEN_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{path}\n")));
}

#[test]
fn test_config_flag_overrides_env_var() {
    let (_dir, path) = temp_config_path();
    kitchen()
        .args(["config", "path", "--config", &path])
        .env("KITCHEN_CONFIG", "/nonexistent/other.yaml")
        .assert()
        .success()
        .stdout(predicate::str::contains(path.as_str()));
}

#[test]
fn test_config_path_json_reports_existence() {
    let (_dir, path) = temp_config_path();
    let output = kitchen()
        .args(["config", "path", "--json"])
        .env("KITCHEN_CONFIG", &path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["path"], path.as_str());
    assert_eq!(value["exists"], false);
}

// ---------------------------------------------------------------------------
// `kitchen config show`
// ---------------------------------------------------------------------------

#[test]
fn test_config_show_without_file_prints_defaults() {
    let (_dir, path) = temp_config_path();
    kitchen()
        .args(["config", "show"])
        .env("KITCHEN_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("# {path}")))
        .stdout(predicate::str::contains("etherstub: stub0"))
        .stdout(predicate::str::contains("vnic: vnic0"))
        .stdout(predicate::str::contains("timeout_secs: 600"));
}

#[test]
fn test_config_show_merges_file_over_defaults() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "network:\n  vnic: vnic7\nzone:\n  name: base\n").unwrap();

    let output = kitchen()
        .args(["config", "show", "--json"])
        .env("KITCHEN_CONFIG", &path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["network"]["vnic"], "vnic7");
    assert_eq!(value["network"]["etherstub"], "stub0");
    assert_eq!(value["zone"]["name"], "base");
    assert_eq!(value["paths"]["dhcpd_conf"], "/etc/inet/dhcpd4.conf");
}

#[test]
fn test_config_show_quiet_prints_yaml_only() {
    let (_dir, path) = temp_config_path();
    kitchen()
        .args(["config", "show", "--quiet"])
        .env("KITCHEN_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("network:"));
}

#[test]
fn test_config_show_rejects_relative_paths() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "paths:\n  ipnat_conf: ipnat.conf\n").unwrap();

    kitchen()
        .args(["config", "show"])
        .env("KITCHEN_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("paths.ipnat_conf must be an absolute path"));
}
