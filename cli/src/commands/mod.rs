//! Command implementations

pub mod config;
pub mod keygen;
pub mod stack;
pub mod version;
