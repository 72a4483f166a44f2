//! Application services: one module per use-case family.

pub mod config_service;
pub mod keygen_service;
pub mod stack_service;
