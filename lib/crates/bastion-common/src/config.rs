//! Stack configuration schema.
//!
//! Every field defaults to the value the stack has always been declared
//! with, so an empty (or absent) config file reproduces it exactly.

use serde::{Deserialize, Serialize};

use crate::keygen::DEFAULT_MODULUS_BITS;

/// Top-level configuration stored in `~/.bastion/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StackConfig {
    pub project: ProjectConfig,
    pub network: NetworkConfig,
    pub instance: InstanceConfig,
    pub key: KeyConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Name of the rendered stack document.
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "blockchain".to_string(),
        }
    }
}

/// Network layout: one VPC, one public subnet, SSH ingress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub vpc_cidr: String,
    pub subnet_cidr: String,
    /// Source range allowed to reach port 22.
    pub ssh_ingress_cidr: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            vpc_cidr: "10.0.0.0/16".to_string(),
            subnet_cidr: "10.0.1.0/24".to_string(),
            ssh_ingress_cidr: "0.0.0.0/0".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    pub ami: String,
    pub instance_type: String,
    pub associate_public_ip: bool,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            ami: "ami-085ad6ae776d8f09c".to_string(),
            instance_type: "t2.micro".to_string(),
            associate_public_ip: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    /// Name registered for the key pair resource.
    pub name: String,
    /// RSA modulus size used by `keygen` and `stack render`.
    pub modulus_bits: usize,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            name: "blockchain-key".to_string(),
            modulus_bits: DEFAULT_MODULUS_BITS,
        }
    }
}
