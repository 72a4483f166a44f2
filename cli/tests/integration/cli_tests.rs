//! Top-level CLI surface: help, version, usage errors.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use predicates::prelude::*;

use crate::{bastion, temp_dir};

#[test]
fn test_help_lists_all_commands() {
    let dir = temp_dir();
    bastion(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("keygen"))
        .stdout(predicate::str::contains("stack"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("version"));
}

#[test]
fn test_no_args_prints_help_and_fails_with_usage_code() {
    let dir = temp_dir();
    bastion(&dir)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    let dir = temp_dir();
    bastion(&dir).arg("deploy").assert().code(2);
}

#[test]
fn test_version_command_prints_package_version() {
    let dir = temp_dir();
    bastion(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(format!("bastion {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_json() {
    let dir = temp_dir();
    let out = bastion(&dir)
        .args(["--json", "version"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_version_flag() {
    let dir = temp_dir();
    bastion(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
