//! Application service: key-pair generation use-cases.

use anyhow::{Context, Result};
use bastion_common::keygen::{EncodedPublicKey, KeyPairGenerator};
use serde::Serialize;

use crate::application::ports::{ProgressReporter, PublicKeySource};

/// A public key together with the metadata shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct KeySummary {
    pub public_key: EncodedPublicKey,
    pub algorithm: String,
    pub modulus_bits: usize,
    pub fingerprint: String,
}

impl KeySummary {
    /// Derive the summary fields from an encoded key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be decoded.
    pub fn describe(public_key: EncodedPublicKey) -> Result<Self> {
        let modulus_bits = public_key.modulus_bits()?;
        let fingerprint = public_key.fingerprint().context("cannot fingerprint key")?;
        Ok(Self {
            algorithm: public_key.algorithm().to_string(),
            public_key,
            modulus_bits,
            fingerprint,
        })
    }
}

/// Generate a fresh key pair on the blocking pool and return its public half.
///
/// RSA prime search is CPU-bound; running it off the async workers keeps
/// progress spinners responsive.
///
/// # Errors
///
/// Returns the underlying `KeyPairError` wrapped in context.
pub async fn generate_public_key(modulus_bits: usize) -> Result<EncodedPublicKey> {
    let key = tokio::task::spawn_blocking(move || {
        KeyPairGenerator::new()
            .with_modulus_bits(modulus_bits)?
            .generate_public_key()
    })
    .await
    .context("key generation task failed")??;
    Ok(key)
}

/// Obtain a key from `source`, reporting progress, and summarise it.
///
/// # Errors
///
/// Returns an error if the source fails or the key cannot be described.
pub async fn obtain_key(
    source: &impl PublicKeySource,
    modulus_bits: usize,
    reporter: &impl ProgressReporter,
) -> Result<KeySummary> {
    reporter.step(&format!("Obtaining public key ({})", source.describe()));
    let key = source.public_key(modulus_bits).await?;
    let summary = KeySummary::describe(key)?;
    reporter.success(&format!(
        "{}-bit {} key {}",
        summary.modulus_bits, summary.algorithm, summary.fingerprint
    ));
    Ok(summary)
}
