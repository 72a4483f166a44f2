//! Compute-stack declaration.
//!
//! Builds the static resource graph handed to the external provisioning
//! engine: one VPC, one public subnet, an SSH-only security group, a key pair
//! carrying the generated public key, and a single instance. Nothing here
//! talks to a cloud API; the rendered YAML program document is the whole
//! output.
//!
//! Resources reference each other with `${name.attribute}` interpolations,
//! which the engine resolves when it builds its dependency graph.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::config::StackConfig;
use crate::error::StackError;
use crate::keygen::EncodedPublicKey;

/// Logical resource names.
pub mod names {
    pub const VPC: &str = "blockchain";
    pub const SUBNET: &str = "public-snet";
    pub const SECURITY_GROUP: &str = "sec-group";
    pub const KEY_PAIR: &str = "ec2-public-key";
    pub const INSTANCE: &str = "blockchain-server";
}

const SSH_PORT: u16 = 22;

// ── CIDR ─────────────────────────────────────────────────────────────────────

/// Prefix lengths a VPC may use.
pub const VPC_PREFIX_RANGE: std::ops::RangeInclusive<u8> = 16..=28;

/// An IPv4 network in `a.b.c.d/len` form with no host bits set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    network: Ipv4Addr,
    prefix: u8,
}

impl Cidr {
    /// Parse `value`, attributing failures to `field`.
    ///
    /// # Errors
    ///
    /// [`StackError::InvalidCidr`] when the text is malformed, the prefix is
    /// above 32, or host bits are set.
    pub fn parse(field: &'static str, value: &str) -> Result<Self, StackError> {
        let invalid = || StackError::InvalidCidr {
            field,
            value: value.to_string(),
        };
        let (addr, prefix) = value.split_once('/').ok_or_else(invalid)?;
        let network = Ipv4Addr::from_str(addr).map_err(|_| invalid())?;
        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
        if prefix > 32 || u32::from(network) & !mask(prefix) != 0 {
            return Err(invalid());
        }
        Ok(Self { network, prefix })
    }

    #[must_use]
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// True if every address of `other` lies inside `self`.
    #[must_use]
    pub fn contains(&self, other: &Cidr) -> bool {
        other.prefix >= self.prefix
            && u32::from(other.network) & mask(self.prefix) == u32::from(self.network)
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

fn mask(prefix: u8) -> u32 {
    match prefix {
        0 => 0,
        p => u32::MAX << (32 - u32::from(p)),
    }
}

// ── References ───────────────────────────────────────────────────────────────

/// An `${resource.attribute}` interpolation resolved by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub resource: &'static str,
    pub attribute: &'static str,
}

impl Reference {
    const fn new(resource: &'static str, attribute: &'static str) -> Self {
        Self {
            resource,
            attribute,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{}.{}}}", self.resource, self.attribute)
    }
}

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Resource properties ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcArgs {
    pub cidr_block: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetArgs {
    pub vpc_id: Reference,
    pub cidr_block: String,
}

/// A single ingress or egress rule. Protocol `-1` means all traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRule {
    pub protocol: String,
    pub from_port: u16,
    pub to_port: u16,
    pub cidr_blocks: Vec<String>,
}

impl SecurityRule {
    fn new(protocol: &str, from_port: u16, to_port: u16, cidr: &str) -> Result<Self, StackError> {
        if from_port > to_port {
            return Err(StackError::InvalidPortRange {
                from: from_port,
                to: to_port,
            });
        }
        Ok(Self {
            protocol: protocol.to_string(),
            from_port,
            to_port,
            cidr_blocks: vec![cidr.to_string()],
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroupArgs {
    pub vpc_id: Reference,
    pub ingress: Vec<SecurityRule>,
    pub egress: Vec<SecurityRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPairArgs {
    pub key_name: String,
    pub public_key: EncodedPublicKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceArgs {
    pub ami: String,
    pub subnet_id: Reference,
    pub instance_type: String,
    pub key_name: Reference,
    pub associate_public_ip_address: bool,
    pub security_groups: Vec<Reference>,
}

/// Typed properties of each supported resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Properties {
    Vpc(VpcArgs),
    Subnet(SubnetArgs),
    SecurityGroup(SecurityGroupArgs),
    KeyPair(KeyPairArgs),
    Instance(InstanceArgs),
}

impl Properties {
    /// Provider type token, e.g. `aws:ec2:Vpc`.
    #[must_use]
    pub fn type_token(&self) -> &'static str {
        match self {
            Self::Vpc(_) => "aws:ec2:Vpc",
            Self::Subnet(_) => "aws:ec2:Subnet",
            Self::SecurityGroup(_) => "aws:ec2:SecurityGroup",
            Self::KeyPair(_) => "aws:ec2:KeyPair",
            Self::Instance(_) => "aws:ec2:Instance",
        }
    }
}

/// A named resource declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: &'static str,
    pub properties: Properties,
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Resource", 2)?;
        state.serialize_field("type", self.properties.type_token())?;
        state.serialize_field("properties", &self.properties)?;
        state.end()
    }
}

/// A stack output exported after apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOutput {
    pub name: &'static str,
    pub value: Reference,
}

// ── Stack ────────────────────────────────────────────────────────────────────

/// The validated, ordered set of resource declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    name: String,
    resources: Vec<Resource>,
    outputs: Vec<StackOutput>,
}

impl Stack {
    /// Validate `config` and declare every resource, embedding `public_key`
    /// in the key pair resource.
    ///
    /// # Errors
    ///
    /// Any [`StackError`] validation failure; nothing is partially built.
    pub fn declare(config: &StackConfig, public_key: EncodedPublicKey) -> Result<Self, StackError> {
        use names::{INSTANCE, KEY_PAIR, SECURITY_GROUP, SUBNET, VPC};

        let Network {
            vpc_cidr,
            subnet_cidr,
            ssh_cidr,
        } = validate(config)?;

        let resources = vec![
            Resource {
                name: VPC,
                properties: Properties::Vpc(VpcArgs {
                    cidr_block: vpc_cidr.to_string(),
                }),
            },
            Resource {
                name: SUBNET,
                properties: Properties::Subnet(SubnetArgs {
                    vpc_id: Reference::new(VPC, "id"),
                    cidr_block: subnet_cidr.to_string(),
                }),
            },
            Resource {
                name: SECURITY_GROUP,
                properties: Properties::SecurityGroup(SecurityGroupArgs {
                    vpc_id: Reference::new(VPC, "id"),
                    ingress: vec![SecurityRule::new(
                        "tcp",
                        SSH_PORT,
                        SSH_PORT,
                        &ssh_cidr.to_string(),
                    )?],
                    egress: vec![SecurityRule::new("-1", 0, 0, "0.0.0.0/0")?],
                }),
            },
            Resource {
                name: KEY_PAIR,
                properties: Properties::KeyPair(KeyPairArgs {
                    key_name: config.key.name.clone(),
                    public_key,
                }),
            },
            Resource {
                name: INSTANCE,
                properties: Properties::Instance(InstanceArgs {
                    ami: config.instance.ami.clone(),
                    subnet_id: Reference::new(SUBNET, "id"),
                    instance_type: config.instance.instance_type.trim().to_string(),
                    key_name: Reference::new(KEY_PAIR, "id"),
                    associate_public_ip_address: config.instance.associate_public_ip,
                    security_groups: vec![Reference::new(SECURITY_GROUP, "id")],
                }),
            },
        ];

        let outputs = vec![
            StackOutput {
                name: "private_snet",
                value: Reference::new(SUBNET, "id"),
            },
            StackOutput {
                name: "instance ip",
                value: Reference::new(INSTANCE, "publicIp"),
            },
            StackOutput {
                name: "ssh key",
                value: Reference::new(KEY_PAIR, "publicKey"),
            },
        ];

        debug!(
            project = %config.project.name,
            resources = resources.len(),
            "stack: declared resources"
        );

        Ok(Self {
            name: config.project.name.clone(),
            resources,
            outputs,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resources in declaration order.
    #[must_use]
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    #[must_use]
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    #[must_use]
    pub fn outputs(&self) -> &[StackOutput] {
        &self.outputs
    }

    /// The public key attached to the key pair resource.
    #[must_use]
    pub fn public_key(&self) -> Option<&EncodedPublicKey> {
        self.resources.iter().find_map(|r| match &r.properties {
            Properties::KeyPair(args) => Some(&args.public_key),
            _ => None,
        })
    }

    /// Render the declarative YAML program document.
    ///
    /// # Errors
    ///
    /// [`StackError::Render`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, StackError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl Serialize for Stack {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Stack", 5)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("runtime", "yaml")?;
        state.serialize_field(
            "description",
            "Public subnet with a single SSH-reachable instance",
        )?;
        state.serialize_field("resources", &ResourceMap(&self.resources))?;
        state.serialize_field("outputs", &OutputMap(&self.outputs))?;
        state.end()
    }
}

/// Serializes resources as a name-keyed map, keeping declaration order.
struct ResourceMap<'a>(&'a [Resource]);

impl Serialize for ResourceMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for resource in self.0 {
            map.serialize_entry(resource.name, resource)?;
        }
        map.end()
    }
}

struct OutputMap<'a>(&'a [StackOutput]);

impl Serialize for OutputMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for output in self.0 {
            map.serialize_entry(output.name, &output.value)?;
        }
        map.end()
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

struct Network {
    vpc_cidr: Cidr,
    subnet_cidr: Cidr,
    ssh_cidr: Cidr,
}

/// Check every field of `config`, including that the subnet lies inside the
/// VPC.
///
/// # Errors
///
/// The first [`StackError`] found.
pub fn validate_config(config: &StackConfig) -> Result<(), StackError> {
    validate(config).map(|_| ())
}

fn validate(config: &StackConfig) -> Result<Network, StackError> {
    validate_project_name(&config.project.name)?;
    let vpc_cidr = Cidr::parse("network.vpc_cidr", &config.network.vpc_cidr)?;
    if !VPC_PREFIX_RANGE.contains(&vpc_cidr.prefix()) {
        return Err(StackError::VpcPrefix {
            value: vpc_cidr.to_string(),
            min: *VPC_PREFIX_RANGE.start(),
            max: *VPC_PREFIX_RANGE.end(),
        });
    }
    let subnet_cidr = Cidr::parse("network.subnet_cidr", &config.network.subnet_cidr)?;
    if !vpc_cidr.contains(&subnet_cidr) {
        return Err(StackError::SubnetOutsideVpc {
            subnet: subnet_cidr.to_string(),
            vpc: vpc_cidr.to_string(),
        });
    }
    let ssh_cidr = Cidr::parse("network.ssh_ingress_cidr", &config.network.ssh_ingress_cidr)?;
    validate_ami(&config.instance.ami)?;
    if config.instance.instance_type.trim().is_empty() {
        return Err(StackError::EmptyInstanceType);
    }
    validate_key_name(&config.key.name)?;
    Ok(Network {
        vpc_cidr,
        subnet_cidr,
        ssh_cidr,
    })
}

/// `ami-` followed by 8 to 17 lowercase hex digits.
///
/// # Errors
///
/// [`StackError::InvalidAmi`] otherwise.
pub fn validate_ami(ami: &str) -> Result<(), StackError> {
    let ok = ami.strip_prefix("ami-").is_some_and(|hex| {
        (8..=17).contains(&hex.len())
            && hex
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    });
    if ok {
        Ok(())
    } else {
        Err(StackError::InvalidAmi(ami.to_string()))
    }
}

/// 1-255 characters from `[A-Za-z0-9._-]`.
///
/// # Errors
///
/// [`StackError::InvalidKeyName`] otherwise.
pub fn validate_key_name(name: &str) -> Result<(), StackError> {
    let ok = (1..=255).contains(&name.len())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if ok {
        Ok(())
    } else {
        Err(StackError::InvalidKeyName(name.to_string()))
    }
}

/// 1-63 characters from `[a-z0-9-]`, not starting or ending with `-`.
///
/// # Errors
///
/// [`StackError::InvalidProjectName`] otherwise.
pub fn validate_project_name(name: &str) -> Result<(), StackError> {
    let ok = (1..=63).contains(&name.len())
        && !name.starts_with('-')
        && !name.ends_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if ok {
        Ok(())
    } else {
        Err(StackError::InvalidProjectName(name.to_string()))
    }
}
