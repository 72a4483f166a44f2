//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `bastion_common`, never
//! from `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use bastion_common::config::StackConfig;
use bastion_common::keygen::EncodedPublicKey;

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, returning defaults when none is stored.
    fn load(&self) -> Result<StackConfig>;
    /// Persist the given configuration.
    fn save(&self, config: &StackConfig) -> Result<()>;
    /// Location of the backing file.
    fn path(&self) -> Result<PathBuf>;
}

// ── Key Port ──────────────────────────────────────────────────────────────────

/// Supplies the public key attached to the stack.
///
/// Production implementations either generate a fresh key pair or read an
/// existing authorized-key file; tests substitute a fixed key.
#[allow(async_fn_in_trait)]
pub trait PublicKeySource {
    /// Produce the encoded public key. `modulus_bits` applies to generated keys.
    async fn public_key(&self, modulus_bits: usize) -> Result<EncodedPublicKey>;
    /// Short human description, e.g. `"generated"` or the file path.
    fn describe(&self) -> String;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts writing command output to the local filesystem.
pub trait ArtifactWriter {
    /// Returns `true` if something already exists at `path`.
    fn exists(&self, path: &Path) -> bool;
    /// Replace `path` with `contents` in a single rename.
    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so application services never touch the
/// terminal directly.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
