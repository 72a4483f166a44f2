//! Infrastructure layer: filesystem and key-source adapters.
//!
//! Implements the port traits defined in `crate::application::ports`.

pub mod config;
pub mod fs;
pub mod keys;
