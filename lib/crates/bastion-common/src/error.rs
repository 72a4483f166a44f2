//! Typed errors for key generation and stack declaration.

use thiserror::Error;

/// Errors raised while producing an SSH key pair.
///
/// Every variant is terminal for the call that produced it: no key material
/// is returned alongside an error.
#[derive(Debug, Error)]
pub enum KeyPairError {
    /// The random source failed, or no prime pair could be found.
    #[error("failed to generate RSA key: {source}")]
    Generation {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The generated key does not satisfy the RSA relationships.
    #[error("failed to validate RSA key: {source}")]
    Validation {
        #[source]
        source: rsa::Error,
    },

    /// The public key could not be marshalled into OpenSSH form.
    #[error("failed to encode public key: {source}")]
    Encoding {
        #[source]
        source: ssh_key::Error,
    },

    #[error("unsupported RSA modulus size {bits}; expected one of 2048, 3072, 4096")]
    UnsupportedModulusSize { bits: usize },
}

impl KeyPairError {
    pub(crate) fn generation(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Generation {
            source: Box::new(source),
        }
    }

    /// Stable machine-readable code used by JSON error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Generation { .. } => "KEY_GENERATION",
            Self::Validation { .. } => "KEY_VALIDATION",
            Self::Encoding { .. } => "KEY_ENCODING",
            Self::UnsupportedModulusSize { .. } => "KEY_MODULUS_SIZE",
        }
    }
}

/// Errors raised while parsing an existing authorized-key line.
#[derive(Debug, Error)]
pub enum PublicKeyParseError {
    #[error("not an OpenSSH public key: {0}")]
    Malformed(#[from] ssh_key::Error),

    #[error("expected an ssh-rsa key, got {0}")]
    UnsupportedAlgorithm(String),

    #[error("RSA modulus of {bits} bits is below the 2048-bit minimum")]
    TooShort { bits: usize },
}

/// Errors raised while validating or rendering a stack declaration.
#[derive(Debug, Error)]
pub enum StackError {
    #[error("invalid CIDR block for {field}: {value:?}")]
    InvalidCidr { field: &'static str, value: String },

    #[error("VPC {value} must have a prefix between /{min} and /{max}")]
    VpcPrefix { value: String, min: u8, max: u8 },

    #[error("subnet {subnet} is not inside VPC {vpc}")]
    SubnetOutsideVpc { subnet: String, vpc: String },

    #[error("invalid AMI id {0:?}: expected ami- followed by 8 to 17 hex digits")]
    InvalidAmi(String),

    #[error("instance type must not be empty")]
    EmptyInstanceType,

    #[error("invalid key name {0:?}: use 1-255 characters from [A-Za-z0-9._-]")]
    InvalidKeyName(String),

    #[error("invalid project name {0:?}: use 1-63 characters from [a-z0-9-]")]
    InvalidProjectName(String),

    #[error("invalid port range {from}-{to}")]
    InvalidPortRange { from: u16, to: u16 },

    #[error("cannot render stack document: {0}")]
    Render(#[from] serde_yaml::Error),
}
