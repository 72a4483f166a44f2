//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },

    #[error("Missing value for {key}")]
    MissingValue { key: String },
}

// ── Output errors ─────────────────────────────────────────────────────────────

/// Errors related to writing command output to disk.
#[derive(Debug, Error)]
pub enum OutputFileError {
    #[error("{0} already exists. Pass --yes to overwrite.")]
    Exists(String),

    #[error("Not overwriting {0}.")]
    Declined(String),
}
