//! Integration tests for `kitchen render` and the read-only `kitchen plan`.
//!
//! Every generated path and the resolver file live in a temp directory.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn kitchen(config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kitchen"));
    cmd.env("NO_COLOR", "1").env("KITCHEN_CONFIG", config);
    cmd
}

/// A config whose host paths all point into `dir`.
fn sandbox(resolv_conf: Option<&str>) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path().display().to_string();
    let config = dir.path().join("config.yaml");
    std::fs::write(
        &config,
        format!(
            "zone:\n  zonepath: {root}/zones/template\n  profile_path: {root}/template.profile\n  manifest_path: {root}/template.xml\n\
             paths:\n  resolv_conf: {root}/resolv.conf\n  ipnat_conf: {root}/ipnat.conf\n  dhcpd_conf: {root}/dhcpd4.conf\n"
        ),
    )
    .expect("write config");
    if let Some(content) = resolv_conf {
        std::fs::write(dir.path().join("resolv.conf"), content).expect("write resolv.conf");
    }
    (dir, config)
}

#[test]
fn test_render_ipnat_prints_nat_rule() {
    let (_dir, config) = sandbox(None);
    kitchen(&config)
        .args(["render", "ipnat"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "map net0 192.168.0.0/24 -> 0/32 portmap tcp/udp auto\n",
        ));
}

#[test]
fn test_render_dhcpd_uses_resolver_facts() {
    let (_dir, config) = sandbox(Some("search lab.example\nnameserver 10.1.1.1\n"));
    kitchen(&config)
        .args(["render", "dhcpd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("option domain-name \"lab.example\";"))
        .stdout(predicate::str::contains("option domain-name-servers 10.1.1.1;"))
        .stdout(predicate::str::contains("subnet 192.168.0.0 netmask 255.255.255.0 {"));
}

#[test]
fn test_render_dhcpd_skips_invalid_nameservers() {
    let (_dir, config) = sandbox(Some("nameserver bogus\nnameserver 10.1.1.1\n"));
    kitchen(&config)
        .args(["render", "dhcpd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("option domain-name \"local\";"))
        .stdout(predicate::str::contains("option domain-name-servers 10.1.1.1;"))
        .stderr(predicate::str::contains("bogus"));
}

#[test]
fn test_render_dhcpd_serves_only_ipv4_nameservers() {
    let (_dir, config) = sandbox(Some(
        "nameserver 2001:db8::53\nnameserver 10.1.1.1\nnameserver fe80::1%net0\n",
    ));
    kitchen(&config)
        .args(["render", "dhcpd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("option domain-name-servers 10.1.1.1;\n"))
        .stdout(predicate::str::contains("2001:db8::53").not())
        .stderr(predicate::str::contains("2001:db8::53"));
}

#[test]
fn test_render_dhcpd_without_resolver_file_fails() {
    let (dir, config) = sandbox(None);
    kitchen(&config)
        .args(["render", "dhcpd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read resolver configuration"))
        .stderr(predicate::str::contains(
            dir.path().join("resolv.conf").display().to_string(),
        ));
}

#[test]
fn test_render_dhcpd_failure_in_json_mode() {
    let (_dir, config) = sandbox(None);
    let output = kitchen(&config)
        .args(["render", "dhcpd", "--json"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["error"], true);
}

#[test]
fn test_render_json_includes_target_path() {
    let (dir, config) = sandbox(None);
    let output = kitchen(&config)
        .args(["render", "profile", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let expected = dir.path().join("template.profile");
    assert_eq!(value["path"], expected.display().to_string());
    let content = value["content"].as_str().unwrap();
    assert!(content.contains("set ip-type=exclusive"));
    assert!(content.contains("set lower-link=stub0"));
}

#[test]
fn test_render_manifest_is_xml() {
    let (_dir, config) = sandbox(None);
    kitchen(&config)
        .args(["render", "manifest"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<?xml"))
        .stdout(predicate::str::contains("template"));
}

#[test]
fn test_render_does_not_write_files() {
    let (dir, config) = sandbox(Some("nameserver 10.1.1.1\n"));
    for file in ["ipnat", "dhcpd", "profile", "manifest"] {
        kitchen(&config).args(["render", file]).assert().success();
    }
    assert!(!dir.path().join("ipnat.conf").exists());
    assert!(!dir.path().join("dhcpd4.conf").exists());
    assert!(!dir.path().join("template.profile").exists());
    assert!(!dir.path().join("template.xml").exists());
}

#[test]
fn test_render_rejects_unknown_file() {
    let (_dir, config) = sandbox(None);
    kitchen(&config)
        .args(["render", "hosts"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

/// Off illumos none of the host tools exist, so every guarded step is
/// pending and only the unguarded forwarding toggle is `always`.
#[cfg(target_os = "linux")]
#[test]
fn test_plan_on_bare_host_reports_pending_steps() {
    let (dir, config) = sandbox(Some("nameserver 10.1.1.1\n"));
    let output = kitchen(&config).args(["plan", "--json"]).output().unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let stages = value["stages"].as_array().unwrap();
    let names: Vec<_> = stages.iter().map(|s| s["stage"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        ["create_network", "configure_nat", "configure_dhcpd", "create_template_zone"]
    );
    let statuses: Vec<_> = stages
        .iter()
        .flat_map(|s| s["steps"].as_array().unwrap())
        .map(|s| s["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses.len(), 12);
    assert_eq!(statuses.iter().filter(|s| **s == "always").count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == "pending").count(), 11);
    assert!(!dir.path().join("ipnat.conf").exists());
}
