//! Unit tests for the bastion CLI library
//!
//! These tests use in-memory adapters and run without spawning the binary.

mod keygen_service;
mod property_tests;
