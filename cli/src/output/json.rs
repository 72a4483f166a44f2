//! JSON output helpers.
//!
//! Provides the error-object formatter used by all `--json` code paths when
//! a command fails.

use anyhow::{Context, Result};
use bastion_common::{KeyPairError, PublicKeyParseError, StackError};
use serde::Serialize;

use crate::domain::error::{ConfigError, OutputFileError};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Pretty-print any serializable value.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn to_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}

/// Map an error chain to a stable machine-readable code.
///
/// The first typed error found in the chain wins.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<KeyPairError>() {
            return e.code();
        }
        if cause.downcast_ref::<PublicKeyParseError>().is_some() {
            return "PUBLIC_KEY_INVALID";
        }
        if cause.downcast_ref::<StackError>().is_some() {
            return "STACK_INVALID";
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return "CONFIG_INVALID";
        }
        if let Some(e) = cause.downcast_ref::<OutputFileError>() {
            return match e {
                OutputFileError::Exists(_) => "OUTPUT_EXISTS",
                OutputFileError::Declined(_) => "OUTPUT_DECLINED",
            };
        }
    }
    "ERROR"
}
