//! Domain layer: pure validation and error types.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;

pub use config::{
    apply_config_value, apply_config_values, config_entries, pair_up, validate_config_key,
    validate_config_value,
};
pub use error::{ConfigError, OutputFileError};
