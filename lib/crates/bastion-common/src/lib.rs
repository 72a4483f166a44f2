//! Shared building blocks for bastion: RSA key-pair generation in OpenSSH
//! authorized-key form, and the compute-stack declaration the key is
//! attached to.

pub mod config;
pub mod error;
pub mod keygen;
pub mod stack;

#[cfg(test)]
mod test_support;

pub use config::{InstanceConfig, KeyConfig, NetworkConfig, ProjectConfig, StackConfig};
pub use error::{KeyPairError, PublicKeyParseError, StackError};
pub use keygen::{EncodedPublicKey, KeyPair, KeyPairGenerator, generate_public_key};
pub use stack::{Cidr, Stack, validate_config};
