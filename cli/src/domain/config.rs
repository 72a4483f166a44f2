//! Domain validators for bastion configuration.
//!
//! Pure functions only, without I/O.

use std::sync::LazyLock;

use anyhow::Result;
use bastion_common::config::StackConfig;
use bastion_common::keygen::SUPPORTED_MODULUS_BITS;
use bastion_common::stack::{self, Cidr};
use regex::Regex;

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "project.name",
    "network.vpc_cidr",
    "network.subnet_cidr",
    "network.ssh_ingress_cidr",
    "instance.ami",
    "instance.instance_type",
    "instance.associate_public_ip",
    "key.name",
    "key.modulus_bits",
];

/// Family, optional generation/attribute suffix, dot, size (`t2.micro`,
/// `c6gn.16xlarge`, `u-6tb1.metal`).
static INSTANCE_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // compile-time constant pattern
    Regex::new(r"^[a-z][a-z0-9-]*\.[a-z0-9]+$").expect("valid regex")
});

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key in isolation.
///
/// Cross-field rules (subnet inside VPC) are checked by [`apply_config_value`].
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |valid: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        valid: valid.to_string(),
    };
    let ok = match key {
        "project.name" => stack::validate_project_name(value).is_ok(),
        "network.vpc_cidr" | "network.subnet_cidr" | "network.ssh_ingress_cidr" => {
            Cidr::parse("value", value).is_ok()
        }
        "instance.ami" => stack::validate_ami(value).is_ok(),
        "instance.instance_type" => INSTANCE_TYPE.is_match(value),
        "instance.associate_public_ip" => value.parse::<bool>().is_ok(),
        "key.name" => stack::validate_key_name(value).is_ok(),
        "key.modulus_bits" => value
            .parse::<usize>()
            .is_ok_and(|bits| SUPPORTED_MODULUS_BITS.contains(&bits)),
        _ => true,
    };
    if ok {
        return Ok(());
    }
    Err(invalid(valid_values(key)).into())
}

fn valid_values(key: &str) -> &'static str {
    match key {
        "project.name" => "1-63 characters from [a-z0-9-]",
        "network.vpc_cidr" | "network.subnet_cidr" | "network.ssh_ingress_cidr" => {
            "an IPv4 network such as 10.0.0.0/16 (no host bits set; VPC prefix /16 to /28)"
        }
        "instance.ami" => "ami- followed by 8 to 17 lowercase hex digits",
        "instance.instance_type" => "an instance type such as t2.micro",
        "instance.associate_public_ip" => "true, false",
        "key.name" => "1-255 characters from [A-Za-z0-9._-]",
        "key.modulus_bits" => "2048, 3072, 4096",
        _ => "",
    }
}

/// Validates `key`/`value` and stores the value in `config`.
///
/// # Errors
///
/// Returns an error if the key is unknown, the value is invalid, or the
/// resulting configuration no longer describes a valid stack.
pub fn apply_config_value(config: &mut StackConfig, key: &str, value: &str) -> Result<()> {
    apply_config_values(config, &[(key, value)])
}

/// Validates and stores several settings as one change.
///
/// Each pair is checked on its own, then the combined result is checked as a
/// whole stack. Fields that depend on each other (the VPC and the subnet
/// inside it) can therefore be moved together. `config` is untouched on any
/// error.
///
/// # Errors
///
/// Returns an error if any key is unknown, any value is invalid, or the
/// resulting configuration no longer describes a valid stack.
pub fn apply_config_values(config: &mut StackConfig, pairs: &[(&str, &str)]) -> Result<()> {
    let mut updated = config.clone();
    for &(key, value) in pairs {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        set_field(&mut updated, key, value)?;
    }
    stack::validate_config(&updated)?;
    *config = updated;
    Ok(())
}

/// Splits `KEY VALUE [KEY VALUE ...]` command-line words into pairs.
///
/// # Errors
///
/// Returns [`ConfigError::MissingValue`] when the last key has no value.
pub fn pair_up(words: &[String]) -> Result<Vec<(&str, &str)>> {
    let chunks = words.chunks_exact(2);
    if let [key] = chunks.remainder() {
        return Err(ConfigError::MissingValue { key: key.clone() }.into());
    }
    Ok(chunks.map(|kv| (kv[0].as_str(), kv[1].as_str())).collect())
}

fn set_field(config: &mut StackConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "project.name" => config.project.name = value.to_string(),
        "network.vpc_cidr" => config.network.vpc_cidr = normalise_cidr(key, value)?,
        "network.subnet_cidr" => config.network.subnet_cidr = normalise_cidr(key, value)?,
        "network.ssh_ingress_cidr" => {
            config.network.ssh_ingress_cidr = normalise_cidr(key, value)?;
        }
        "instance.ami" => config.instance.ami = value.to_string(),
        "instance.instance_type" => config.instance.instance_type = value.to_string(),
        "instance.associate_public_ip" => config.instance.associate_public_ip = value.parse()?,
        "key.name" => config.key.name = value.to_string(),
        "key.modulus_bits" => config.key.modulus_bits = value.parse()?,
        _ => anyhow::bail!("Unknown setting: {key}"),
    }
    Ok(())
}

/// Stores CIDRs in canonical `a.b.c.d/len` form.
fn normalise_cidr(key: &str, value: &str) -> Result<String> {
    let field = VALID_CONFIG_KEYS
        .iter()
        .find(|k| **k == key)
        .copied()
        .unwrap_or("value");
    Ok(Cidr::parse(field, value)?.to_string())
}

/// Flattens `config` into `(key, value)` pairs in whitelist order.
#[must_use]
pub fn config_entries(config: &StackConfig) -> Vec<(&'static str, String)> {
    vec![
        ("project.name", config.project.name.clone()),
        ("network.vpc_cidr", config.network.vpc_cidr.clone()),
        ("network.subnet_cidr", config.network.subnet_cidr.clone()),
        ("network.ssh_ingress_cidr", config.network.ssh_ingress_cidr.clone()),
        ("instance.ami", config.instance.ami.clone()),
        ("instance.instance_type", config.instance.instance_type.clone()),
        (
            "instance.associate_public_ip",
            config.instance.associate_public_ip.to_string(),
        ),
        ("key.name", config.key.name.clone()),
        ("key.modulus_bits", config.key.modulus_bits.to_string()),
    ]
}

// ── Unit tests ───────────────────────────────────────────────────────────────
