//! Public key sources: implements `PublicKeySource`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bastion_common::keygen::EncodedPublicKey;

use crate::application::ports::PublicKeySource;
use crate::application::services::keygen_service;

/// Generates a fresh RSA key pair from OS entropy. The private half is
/// discarded once the public key has been encoded.
pub struct GeneratedKey;

impl PublicKeySource for GeneratedKey {
    async fn public_key(&self, modulus_bits: usize) -> Result<EncodedPublicKey> {
        keygen_service::generate_public_key(modulus_bits).await
    }

    fn describe(&self) -> String {
        "generated".to_string()
    }
}

/// Reads an existing authorized-key line (e.g. `~/.ssh/id_rsa.pub`).
pub struct AuthorizedKeyFile {
    path: PathBuf,
}

impl AuthorizedKeyFile {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PublicKeySource for AuthorizedKeyFile {
    async fn public_key(&self, _modulus_bits: usize) -> Result<EncodedPublicKey> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        let line = content
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with('#'))
            .ok_or_else(|| anyhow::anyhow!("{} contains no public key", self.path.display()))?;
        line.parse::<EncodedPublicKey>()
            .with_context(|| format!("invalid public key in {}", self.path.display()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
