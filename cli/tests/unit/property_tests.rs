//! Property-based tests for configuration validation.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;

use bastion_cli::domain::config::{
    VALID_CONFIG_KEYS, apply_config_value, validate_config_key, validate_config_value,
};
use bastion_common::config::StackConfig;

proptest! {
    /// Arbitrary dotted keys outside the whitelist are rejected.
    #[test]
    fn prop_arbitrary_keys_rejected(key in "[a-z]{1,20}\\.[a-z_]{1,20}") {
        prop_assume!(!VALID_CONFIG_KEYS.contains(&key.as_str()));
        prop_assert!(validate_config_key(&key).is_err());
    }

    /// Every whitelisted key is accepted.
    #[test]
    fn prop_whitelisted_keys_accepted(idx in 0..VALID_CONFIG_KEYS.len()) {
        prop_assert!(validate_config_key(VALID_CONFIG_KEYS[idx]).is_ok());
    }

    /// Only the supported modulus sizes pass validation.
    #[test]
    fn prop_modulus_bits_whitelist(bits in 0usize..10_000) {
        let ok = validate_config_value("key.modulus_bits", &bits.to_string()).is_ok();
        prop_assert_eq!(ok, matches!(bits, 2048 | 3072 | 4096));
    }

    /// Any /24 inside 10.0.0.0/16 is a valid subnet for the default VPC.
    #[test]
    fn prop_subnet_inside_default_vpc_accepted(octet in 0u8..=255) {
        let mut config = StackConfig::default();
        let subnet = format!("10.0.{octet}.0/24");
        prop_assert!(apply_config_value(&mut config, "network.subnet_cidr", &subnet).is_ok());
        prop_assert_eq!(config.network.subnet_cidr, subnet);
    }

    /// A subnet outside the default VPC leaves the config untouched.
    #[test]
    fn prop_subnet_outside_default_vpc_rejected(second in 1u8..=255, third in 0u8..=255) {
        let mut config = StackConfig::default();
        let subnet = format!("10.{second}.{third}.0/24");
        prop_assert!(apply_config_value(&mut config, "network.subnet_cidr", &subnet).is_err());
        prop_assert_eq!(config, StackConfig::default());
    }

    /// Non-boolean strings are rejected for the public IP flag.
    #[test]
    fn prop_public_ip_requires_bool(value in "[a-z]{1,8}") {
        prop_assume!(value != "true" && value != "false");
        prop_assert!(validate_config_value("instance.associate_public_ip", &value).is_err());
    }
}
