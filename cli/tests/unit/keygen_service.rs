//! Tests for `keygen_service`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bastion_cli::application::services::keygen_service::{self, KeySummary};
use bastion_common::KeyPairError;

use crate::helpers::{FixedKey, RSA_2048_LINE, RecordingReporter};

#[test]
fn test_summary_describes_fixture_key() {
    let summary = KeySummary::describe(RSA_2048_LINE.parse().unwrap()).unwrap();
    assert_eq!(summary.algorithm, "ssh-rsa");
    assert_eq!(summary.modulus_bits, 2048);
    assert!(summary.fingerprint.starts_with("SHA256:"));
}

#[test]
fn test_summary_serializes_key_as_string() {
    let summary = KeySummary::describe(RSA_2048_LINE.parse().unwrap()).unwrap();
    let v = serde_json::to_value(&summary).unwrap();
    assert_eq!(v["public_key"], RSA_2048_LINE);
    assert_eq!(v["modulus_bits"], 2048);
}

#[tokio::test]
async fn test_obtain_key_reports_step_then_success() {
    let reporter = RecordingReporter::default();
    let summary = keygen_service::obtain_key(&FixedKey::default(), 2048, &reporter)
        .await
        .unwrap();
    let events = reporter.events.borrow();
    assert_eq!(events.len(), 2);
    assert!(events[1].contains(&summary.fingerprint));
}

#[tokio::test]
async fn test_generate_public_key_default_size() {
    let key = keygen_service::generate_public_key(2048).await.unwrap();
    assert!(key.as_str().starts_with("ssh-rsa "));
    assert_eq!(key.modulus_bits().unwrap(), 2048);
}

#[tokio::test]
async fn test_generate_public_key_rejects_unsupported_size() {
    let err = keygen_service::generate_public_key(1024).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<KeyPairError>(),
        Some(KeyPairError::UnsupportedModulusSize { bits: 1024 })
    ));
}
