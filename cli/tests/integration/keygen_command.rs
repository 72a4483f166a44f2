//! Integration tests for `bastion keygen`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use predicates::prelude::*;

use crate::{bastion, temp_dir};

#[test]
fn test_keygen_prints_single_authorized_key_line() {
    let dir = temp_dir();
    let out = bastion(&dir).arg("keygen").assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();
    let line = text.strip_suffix('\n').expect("trailing newline");
    assert!(!line.contains('\n'), "stdout must be one line: {text:?}");
    assert!(
        predicate::str::is_match(r"^ssh-rsa [A-Za-z0-9+/]+=*$")
            .unwrap()
            .eval(line),
        "got: {line}"
    );
}

#[test]
fn test_keygen_wire_blob_starts_with_algorithm_name() {
    let dir = temp_dir();
    let out = bastion(&dir).arg("keygen").assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();
    let material = text.trim().split(' ').nth(1).unwrap();
    let blob = STANDARD.decode(material).unwrap();
    assert_eq!(&blob[..11], b"\x00\x00\x00\x07ssh-rsa");
}

#[test]
fn test_keygen_twice_gives_different_keys() {
    let dir = temp_dir();
    let a = bastion(&dir).arg("keygen").output().unwrap().stdout;
    let b = bastion(&dir).arg("keygen").output().unwrap().stdout;
    assert_ne!(a, b);
}

#[test]
fn test_keygen_json_has_summary_fields() {
    let dir = temp_dir();
    let out = bastion(&dir)
        .args(["--json", "keygen"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert!(v["public_key"].as_str().unwrap().starts_with("ssh-rsa "));
    assert_eq!(v["algorithm"], "ssh-rsa");
    assert_eq!(v["modulus_bits"], 2048);
    assert!(v["fingerprint"].as_str().unwrap().starts_with("SHA256:"));
    assert!(v["generated_at"].is_string());
}

#[test]
fn test_keygen_output_writes_key_file() {
    let dir = temp_dir();
    let path = dir.path().join("keys").join("id_rsa.pub");
    let out = bastion(&dir)
        .args(["keygen", "--output"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, String::from_utf8(out).unwrap());
    assert!(written.ends_with('\n'));
}

#[test]
fn test_keygen_refuses_to_overwrite_without_yes() {
    let dir = temp_dir();
    let path = dir.path().join("id_rsa.pub");
    std::fs::write(&path, "keep me\n").unwrap();
    bastion(&dir)
        .args(["keygen", "--output"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me\n");
}

#[test]
fn test_keygen_overwrite_with_yes() {
    let dir = temp_dir();
    let path = dir.path().join("id_rsa.pub");
    std::fs::write(&path, "old\n").unwrap();
    bastion(&dir)
        .args(["--yes", "keygen", "--output"])
        .arg(&path)
        .assert()
        .success();
    assert!(std::fs::read_to_string(&path).unwrap().starts_with("ssh-rsa "));
}

#[test]
fn test_keygen_overwrite_refusal_json_error_code() {
    let dir = temp_dir();
    let path = dir.path().join("id_rsa.pub");
    std::fs::write(&path, "x").unwrap();
    let out = bastion(&dir)
        .args(["--json", "keygen", "--output"])
        .arg(&path)
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["error"], true);
    assert_eq!(v["code"], "OUTPUT_EXISTS");
}

#[test]
fn test_keygen_honours_configured_modulus_size() {
    let dir = temp_dir();
    bastion(&dir)
        .args(["config", "set", "key.modulus_bits", "3072"])
        .assert()
        .success();
    let out = bastion(&dir)
        .args(["--json", "keygen"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["modulus_bits"], 3072);
}
