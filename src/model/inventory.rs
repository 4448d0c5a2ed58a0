//! Inventory entity types, mirroring the scan endpoint's wire format.
//!
//! Field names follow the JSON payload exactly. Every optional or
//! possibly-absent wire field deserializes leniently via `#[serde(default)]`:
//! absence means empty, never a decode error. No entity holds a back-reference
//! to its parent; ancestor context is attached explicitly by the projection
//! engine when a flat row needs it.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// One region's slice of the inventory: the top-level JSON array element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Region name, e.g. `us-east-1`.
    pub region: String,
    #[serde(default)]
    pub vpcs: Vec<Vpc>,
    /// Region-level scan failure. Opaque to the projection engine; the region
    /// is still projected with whatever (typically empty) VPC list it carries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Region {
    /// Total subnet count across all VPCs in this region.
    #[must_use]
    pub fn subnet_count(&self) -> usize {
        self.vpcs.iter().map(|v| v.subnets.len()).sum()
    }

    /// Total instance count across all VPCs in this region.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.vpcs
            .iter()
            .flat_map(|v| &v.subnets)
            .map(|s| s.instances.len())
            .sum()
    }
}

/// An isolated virtual network within a region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vpc {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cidr: String,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
}

/// An IP-range partition of a VPC, bound to one availability zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cidr: String,
    #[serde(default)]
    pub az: String,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

/// A compute instance with network identity and attached inbound rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub instance_type: String,
    /// Lifecycle state, free-form. Only `"running"` carries special meaning.
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub private_ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
    #[serde(default)]
    pub security_rules: Vec<SecurityRule>,
}

impl Instance {
    /// Whether the instance is in the active lifecycle state.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

/// One inbound permission entry referencing an owning security group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityRule {
    #[serde(default)]
    pub protocol: String,
    /// Inclusive port range. `None` on either end means "all ports".
    #[serde(default)]
    pub from_port: Option<i64>,
    #[serde(default)]
    pub to_port: Option<i64>,
    /// Allowed sources: CIDR blocks or security-group references.
    #[serde(default)]
    pub source: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// Owning security-group id. Empty means the rule contributes nothing to
    /// any [`SecurityGroupSummary`].
    #[serde(default)]
    pub sg_id: String,
    #[serde(default)]
    pub sg_name: String,
}

impl SecurityRule {
    /// Human-readable port range: `443` for a single port, `8000-8080` for a
    /// span, `All` when either end is absent.
    #[must_use]
    pub fn port_range_label(&self) -> String {
        match (self.from_port, self.to_port) {
            (Some(from), Some(to)) if from == to => from.to_string(),
            (Some(from), Some(to)) => format!("{from}-{to}"),
            _ => "All".to_string(),
        }
    }
}

/// A deduplicated security-group reference, derived per VPC by the
/// aggregator. Not part of the raw inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupSummary {
    pub id: String,
    pub name: String,
}

/// Content hash identifying one inventory snapshot.
///
/// Used as the snapshot half of the projection cache key; two snapshots with
/// equal serialized content hash equal.
#[must_use]
pub fn content_hash(inventory: &[Region]) -> u64 {
    serde_json::to_vec(inventory).map_or(0, |bytes| xxh3_64(&bytes))
}
