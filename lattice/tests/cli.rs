//! Binary-level tests for the batch commands
//!
//! Every run gets its own HOME and an explicit config that points the
//! credential file into a temp dir, so nothing touches the real user files.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

struct TestEnv {
    tmp: TempDir,
    config: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        fs::create_dir_all(tmp.path().join("home")).expect("create home");
        let config = tmp.path().join("lattice.yml");
        let yaml = format!(
            "storage:\n  credential-file: {}\n",
            tmp.path().join("keys").join("credential.json").display()
        );
        fs::write(&config, yaml).expect("write config");
        Self { tmp, config }
    }

    fn credential_file(&self) -> PathBuf {
        self.tmp.path().join("keys").join("credential.json")
    }

    fn cmd(&self) -> Command {
        let home = self.tmp.path().join("home");
        let mut cmd = cargo_bin_cmd!("lattice");
        cmd.env("HOME", &home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env("XDG_DATA_HOME", home.join(".local/share"))
            .arg("--config")
            .arg(&self.config);
        cmd
    }
}

#[test]
fn test_help_lists_commands() {
    let env = TestEnv::new();
    env.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("analyze"))
        .stdout(contains("strategize"))
        .stdout(contains("key"))
        .stdout(contains("lattice.log"));
}

#[test]
fn test_key_set_show_clear() {
    let env = TestEnv::new();

    env.cmd()
        .args(["key", "set", "AIzaSyIntegrationKey42"])
        .assert()
        .success()
        .stdout(contains("AIza…ey42"))
        .stdout(contains("AIzaSyIntegrationKey42").not());
    assert!(env.credential_file().exists());

    env.cmd()
        .args(["key", "show"])
        .assert()
        .success()
        .stdout(contains("AIza…ey42"))
        .stdout(contains("AIzaSyIntegrationKey42").not());

    env.cmd().args(["key", "clear"]).assert().success();
    assert!(!env.credential_file().exists());

    env.cmd()
        .args(["key", "show"])
        .assert()
        .success()
        .stdout(contains("No API key saved."));
}

#[test]
fn test_key_set_rejects_blank() {
    let env = TestEnv::new();
    env.cmd().args(["key", "set", "   "]).assert().failure();
    assert!(!env.credential_file().exists());
}

#[test]
fn test_analyze_without_key_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["analyze", "Launch a bakery"])
        .assert()
        .failure()
        .stderr(contains("lattice key set"));
}

#[test]
fn test_strategize_rejects_unknown_format() {
    let env = TestEnv::new();
    env.cmd()
        .args(["strategize", "Launch a bakery", "--format", "table"])
        .assert()
        .failure()
        .stderr(contains("Unknown format"));
}

#[test]
fn test_missing_config_file_fails() {
    let env = TestEnv::new();
    let mut cmd = cargo_bin_cmd!("lattice");
    cmd.env("HOME", env.tmp.path().join("home"))
        .args(["--config", "/definitely/not/here.yml", "key", "show"])
        .assert()
        .failure()
        .stderr(contains("Failed to load config"));
}
