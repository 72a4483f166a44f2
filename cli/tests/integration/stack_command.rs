//! Integration tests for `bastion stack render`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use predicates::prelude::*;
use tempfile::TempDir;

use crate::{RSA_2048_LINE, bastion, temp_dir};

fn key_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("id_rsa.pub");
    std::fs::write(&path, format!("# deploy key\n\n{RSA_2048_LINE} ops@example\n")).unwrap();
    path
}

fn render_document(dir: &TempDir) -> serde_yaml::Value {
    let out = bastion(dir)
        .args(["stack", "render", "--public-key-file"])
        .arg(key_file(dir))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_yaml::from_slice(&out).unwrap()
}

#[test]
fn test_render_declares_resources_in_order() {
    let dir = temp_dir();
    let doc = render_document(&dir);
    let names: Vec<&str> = doc["resources"]
        .as_mapping()
        .unwrap()
        .keys()
        .map(|k| k.as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        ["blockchain", "public-snet", "sec-group", "ec2-public-key", "blockchain-server"]
    );
}

#[test]
fn test_render_embeds_supplied_key_without_comment() {
    let dir = temp_dir();
    let doc = render_document(&dir);
    let key = &doc["resources"]["ec2-public-key"];
    assert_eq!(key["type"], "aws:ec2:KeyPair");
    assert_eq!(key["properties"]["keyName"], "blockchain-key");
    assert_eq!(key["properties"]["publicKey"], RSA_2048_LINE);
}

#[test]
fn test_render_defaults_and_references() {
    let dir = temp_dir();
    let doc = render_document(&dir);
    assert_eq!(doc["name"], "blockchain");
    assert_eq!(doc["runtime"], "yaml");
    let server = &doc["resources"]["blockchain-server"]["properties"];
    assert_eq!(server["ami"], "ami-085ad6ae776d8f09c");
    assert_eq!(server["instanceType"], "t2.micro");
    assert_eq!(server["keyName"], "${ec2-public-key.id}");
    assert_eq!(server["associatePublicIpAddress"], true);
    assert_eq!(doc["outputs"]["instance ip"], "${blockchain-server.publicIp}");
    assert_eq!(doc["outputs"]["ssh key"], "${ec2-public-key.publicKey}");
}

#[test]
fn test_render_generates_key_when_no_file_given() {
    let dir = temp_dir();
    let out = bastion(&dir)
        .args(["stack", "render"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let doc: serde_yaml::Value = serde_yaml::from_slice(&out).unwrap();
    let key = doc["resources"]["ec2-public-key"]["properties"]["publicKey"]
        .as_str()
        .unwrap();
    assert!(key.starts_with("ssh-rsa AAAAB3NzaC1yc2E"));
}

#[test]
fn test_render_uses_configured_values() {
    let dir = temp_dir();
    bastion(&dir)
        .args(["config", "set", "instance.instance_type", "t3.small"])
        .assert()
        .success();
    let doc = render_document(&dir);
    assert_eq!(
        doc["resources"]["blockchain-server"]["properties"]["instanceType"],
        "t3.small"
    );
}

#[test]
fn test_render_rejects_subnet_outside_vpc() {
    let dir = temp_dir();
    std::fs::write(
        dir.path().join("config.yaml"),
        "network:\n  vpc_cidr: 10.0.0.0/16\n  subnet_cidr: 192.168.1.0/24\n",
    )
    .unwrap();
    bastion(&dir)
        .args(["stack", "render", "--public-key-file"])
        .arg(key_file(&dir))
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid stack configuration"));
}

#[test]
fn test_render_rejects_short_key_file() {
    let dir = temp_dir();
    let path = dir.path().join("short.pub");
    std::fs::write(
        &path,
        "ssh-rsa AAAAB3NzaC1yc2EAAAADAQABAAAAgQC6I1T9UCwvgFOnXajHeTK+1LBe88K749aq6xMUuVS4hx0CZD4mtnvKI83lpA2wx2SEi6G5HVpVaBiZfBXK889+OQvzGC/tu4mX4JRJmryjtK1IUBUppA2liCSeiqdL5Vu8gy8IA2a/5GIR+mxWeO618VXQyfodWM2ekTVKe1x4mw==\n",
    )
    .unwrap();
    let out = bastion(&dir)
        .args(["--json", "stack", "render", "--public-key-file"])
        .arg(&path)
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["code"], "PUBLIC_KEY_INVALID");
}

#[test]
fn test_render_missing_key_file_fails() {
    let dir = temp_dir();
    bastion(&dir)
        .args(["stack", "render", "--public-key-file"])
        .arg(dir.path().join("nope.pub"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn test_render_json_wraps_document() {
    let dir = temp_dir();
    let out = bastion(&dir)
        .args(["--json", "stack", "render", "--public-key-file"])
        .arg(key_file(&dir))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["name"], "blockchain");
    assert_eq!(v["resources"].as_array().unwrap().len(), 5);
    assert_eq!(v["key"]["public_key"], RSA_2048_LINE);
    assert!(v["document"].as_str().unwrap().contains("aws:ec2:Instance"));
}

#[test]
fn test_render_output_writes_document_file() {
    let dir = temp_dir();
    let target = dir.path().join("stack.yaml");
    bastion(&dir)
        .args(["stack", "render", "--public-key-file"])
        .arg(key_file(&dir))
        .arg("--output")
        .arg(&target)
        .assert()
        .success();
    let doc: serde_yaml::Value =
        serde_yaml::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(doc["name"], "blockchain");
}
