//! SSH key-pair generation.
//!
//! Produces an RSA key pair from a cryptographically secure random source and
//! renders its public half as a single `authorized_keys` line
//! (`ssh-rsa <base64>`, no comment). The private half never leaves this
//! module: [`KeyPair`] exposes no accessor for it and the underlying
//! [`RsaPrivateKey`] zeroizes itself on drop.
//!
//! ```no_run
//! let line = bastion_common::keygen::generate_public_key()?;
//! assert!(line.as_str().starts_with("ssh-rsa "));
//! # Ok::<(), bastion_common::KeyPairError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use rand::rngs::{OsRng, StdRng};
use rand::{CryptoRng, RngCore, SeedableRng};
use rsa::RsaPrivateKey;
use rsa::traits::PublicKeyParts;
use serde::{Deserialize, Serialize};
use ssh_key::public::{KeyData, RsaPublicKey};
use ssh_key::{HashAlg, Mpint, PublicKey};
use tracing::debug;

use crate::error::{KeyPairError, PublicKeyParseError};

/// Modulus size used when nothing else is configured.
pub const DEFAULT_MODULUS_BITS: usize = 2048;

/// Modulus sizes the generator accepts.
pub const SUPPORTED_MODULUS_BITS: &[usize] = &[2048, 3072, 4096];

/// Algorithm identifier prefix of every encoded key.
pub const SSH_RSA: &str = "ssh-rsa";

/// Generate a fresh 2048-bit key pair from OS entropy and return its public
/// half as an authorized-key line.
///
/// # Errors
///
/// See [`KeyPairError`]; the call never retries internally.
pub fn generate_public_key() -> Result<EncodedPublicKey, KeyPairError> {
    KeyPairGenerator::new().generate_public_key()
}

// ── Generator ────────────────────────────────────────────────────────────────

/// Generates RSA key pairs from a caller-chosen random source.
///
/// The source is only used to seed a ChaCha-based CSPRNG, through the
/// fallible `try_fill_bytes` path, so an exhausted or broken source surfaces
/// as [`KeyPairError::Generation`] instead of a panic deep inside prime
/// search.
pub struct KeyPairGenerator<R = OsRng> {
    rng: R,
    modulus_bits: usize,
}

impl KeyPairGenerator<OsRng> {
    /// Generator backed by the operating system's entropy source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(OsRng)
    }
}

impl Default for KeyPairGenerator<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> KeyPairGenerator<R> {
    /// Generator backed by an arbitrary cryptographic random source.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            modulus_bits: DEFAULT_MODULUS_BITS,
        }
    }

    /// Override the modulus size.
    ///
    /// # Errors
    ///
    /// Returns [`KeyPairError::UnsupportedModulusSize`] unless `bits` is one
    /// of [`SUPPORTED_MODULUS_BITS`].
    pub fn with_modulus_bits(mut self, bits: usize) -> Result<Self, KeyPairError> {
        if !SUPPORTED_MODULUS_BITS.contains(&bits) {
            return Err(KeyPairError::UnsupportedModulusSize { bits });
        }
        self.modulus_bits = bits;
        Ok(self)
    }

    /// Configured modulus size in bits.
    #[must_use]
    pub fn bits(&self) -> usize {
        self.modulus_bits
    }

    /// Generate and validate a key pair, keeping it in memory.
    ///
    /// # Errors
    ///
    /// [`KeyPairError::Generation`] if the random source fails or no primes
    /// are found; [`KeyPairError::Validation`] if the result is inconsistent.
    pub fn generate(&mut self) -> Result<KeyPair, KeyPairError> {
        let mut csprng = StdRng::from_rng(&mut self.rng).map_err(KeyPairError::generation)?;
        let private = RsaPrivateKey::new(&mut csprng, self.modulus_bits)
            .map_err(KeyPairError::generation)?;
        validate_private(&private)?;

        debug!(bits = self.modulus_bits, "keygen: generated RSA key pair");
        Ok(KeyPair { private })
    }

    /// Generate a key pair and return only its encoded public half.
    ///
    /// The private key is dropped (and zeroized) before this returns.
    ///
    /// # Errors
    ///
    /// Any error from [`generate`](Self::generate) or
    /// [`KeyPair::encode_public_key`].
    pub fn generate_public_key(&mut self) -> Result<EncodedPublicKey, KeyPairError> {
        self.generate()?.encode_public_key()
    }
}

/// Check that the primes multiply to the modulus and that the exponents
/// are inverse modulo each `p - 1`.
fn validate_private(private: &RsaPrivateKey) -> Result<(), KeyPairError> {
    private
        .validate()
        .map_err(|source| KeyPairError::Validation { source })
}

// ── Key pair ─────────────────────────────────────────────────────────────────

/// An in-memory RSA key pair. Not cloneable, not serializable.
pub struct KeyPair {
    private: RsaPrivateKey,
}

impl KeyPair {
    /// Bit length of the modulus.
    #[must_use]
    pub fn modulus_bits(&self) -> usize {
        self.private.n().bits()
    }

    /// Encode the public half as `ssh-rsa <base64>`.
    ///
    /// Deterministic: the same pair always yields the same bytes.
    ///
    /// # Errors
    ///
    /// [`KeyPairError::Encoding`] if the key cannot be marshalled.
    pub fn encode_public_key(&self) -> Result<EncodedPublicKey, KeyPairError> {
        let public = self.private.to_public_key();
        let key_data = RsaPublicKey::try_from(&public)
            .map(KeyData::Rsa)
            .map_err(|source| KeyPairError::Encoding { source })?;
        let line = PublicKey::from(key_data)
            .to_openssh()
            .map_err(|source| KeyPairError::Encoding { source })?;
        Ok(EncodedPublicKey(line))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("modulus_bits", &self.modulus_bits())
            .finish_non_exhaustive()
    }
}

// ── Encoded public key ───────────────────────────────────────────────────────

/// A public key in single-line authorized-key form, without a comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncodedPublicKey(String);

impl EncodedPublicKey {
    /// The full `ssh-rsa <base64>` line.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The algorithm identifier (always `ssh-rsa`).
    #[must_use]
    pub fn algorithm(&self) -> &str {
        self.0.split_once(' ').map_or(self.0.as_str(), |(alg, _)| alg)
    }

    /// The base64 key material after the algorithm identifier.
    #[must_use]
    pub fn material(&self) -> &str {
        self.0.split_once(' ').map_or("", |(_, material)| material)
    }

    /// Parse the line back into a structured public key.
    ///
    /// # Errors
    ///
    /// Only fails if the string was not produced by this module.
    pub fn decode(&self) -> Result<PublicKey, ssh_key::Error> {
        PublicKey::from_openssh(&self.0)
    }

    /// Modulus bit length of the encoded key.
    ///
    /// # Errors
    ///
    /// Fails if the line cannot be decoded.
    pub fn modulus_bits(&self) -> Result<usize, PublicKeyParseError> {
        let key = self.decode()?;
        rsa_modulus_bits(&key)
    }

    /// OpenSSH SHA-256 fingerprint, e.g. `SHA256:Xk3...`.
    ///
    /// # Errors
    ///
    /// Fails if the line cannot be decoded.
    pub fn fingerprint(&self) -> Result<String, ssh_key::Error> {
        Ok(self.decode()?.fingerprint(HashAlg::Sha256).to_string())
    }
}

impl fmt::Display for EncodedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EncodedPublicKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<EncodedPublicKey> for String {
    fn from(key: EncodedPublicKey) -> Self {
        key.0
    }
}

impl TryFrom<String> for EncodedPublicKey {
    type Error = PublicKeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Parses an existing authorized-key line such as the contents of
/// `~/.ssh/id_rsa.pub`. Any trailing comment is dropped.
impl FromStr for EncodedPublicKey {
    type Err = PublicKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = PublicKey::from_openssh(s.trim())?;
        let bits = rsa_modulus_bits(&key)?;
        if bits < DEFAULT_MODULUS_BITS {
            return Err(PublicKeyParseError::TooShort { bits });
        }
        let line = PublicKey::from(key.key_data().clone()).to_openssh()?;
        Ok(Self(line))
    }
}

fn rsa_modulus_bits(key: &PublicKey) -> Result<usize, PublicKeyParseError> {
    let rsa = key.key_data().rsa().ok_or_else(|| {
        PublicKeyParseError::UnsupportedAlgorithm(key.algorithm().as_str().to_string())
    })?;
    Ok(mpint_bits(&rsa.n))
}

fn mpint_bits(n: &Mpint) -> usize {
    let bytes = n.as_positive_bytes().unwrap_or_default();
    let Some(pos) = bytes.iter().position(|b| *b != 0) else {
        return 0;
    };
    let significant = &bytes[pos..];
    (significant.len() - 1) * 8 + (8 - significant[0].leading_zeros() as usize)
}
