//! The projection engine: pure transformations from one inventory snapshot
//! and a selected resource filter to either a pruned tree or a flat row set.
//!
//! [`project`] is the single entry point. It is deterministic, has no side
//! effects, and is total over all inputs: a malformed or empty inventory
//! yields an empty projection of the appropriate mode, never an error.

mod aggregate;
mod builder;

pub use aggregate::aggregate_security_groups;
pub use builder::project;

use crate::model::{content_hash, Instance, Region, SecurityGroupSummary, Subnet};
use serde::{Deserialize, Serialize};

/// The user-selected lens that decides projection shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[derive(clap::ValueEnum)]
pub enum ResourceFilter {
    /// Full hierarchy: Region → VPC → Subnet → Instance.
    #[default]
    All,
    /// Network-only hierarchy: Region → VPC, children hidden.
    Vpc,
    /// Flat table, one row per subnet.
    Subnet,
    /// Flat table, one row per instance.
    Instance,
    /// Deduplicated rollup: Region → VPC → security group.
    SecurityGroup,
}

impl ResourceFilter {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Resources",
            Self::Vpc => "VPCs",
            Self::Subnet => "Subnets",
            Self::Instance => "Instances",
            Self::SecurityGroup => "Security Groups",
        }
    }

    /// Cycle forward through the filters.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Vpc,
            Self::Vpc => Self::Subnet,
            Self::Subnet => Self::Instance,
            Self::Instance => Self::SecurityGroup,
            Self::SecurityGroup => Self::All,
        }
    }

    /// Cycle backward through the filters.
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::All => Self::SecurityGroup,
            Self::Vpc => Self::All,
            Self::Subnet => Self::Vpc,
            Self::Instance => Self::Subnet,
            Self::SecurityGroup => Self::Instance,
        }
    }

    /// Whether this filter projects to a tree (as opposed to flat rows).
    #[must_use]
    pub const fn is_tree(self) -> bool {
        matches!(self, Self::All | Self::Vpc | Self::SecurityGroup)
    }
}

/// Output shape of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Tree,
    Flat,
}

/// The engine's output for one (inventory, filter) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Tree(Vec<ViewNode>),
    Flat(Vec<FlatRow>),
}

impl Projection {
    #[must_use]
    pub const fn mode(&self) -> ProjectionMode {
        match self {
            Self::Tree(_) => ProjectionMode::Tree,
            Self::Flat(_) => ProjectionMode::Flat,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Tree(roots) => roots.is_empty(),
            Self::Flat(rows) => rows.is_empty(),
        }
    }

    /// Tree roots, or an empty slice for a flat projection.
    #[must_use]
    pub fn roots(&self) -> &[ViewNode] {
        match self {
            Self::Tree(roots) => roots,
            Self::Flat(_) => &[],
        }
    }

    /// Flat rows, or an empty slice for a tree projection.
    #[must_use]
    pub fn rows(&self) -> &[FlatRow] {
        match self {
            Self::Flat(rows) => rows,
            Self::Tree(_) => &[],
        }
    }
}

/// One node of a tree projection.
///
/// A proper tagged sum type: one concrete payload shape per variant, matched
/// exhaustively by consumers. Leaf variants carry their owning region's name
/// so a row can be rendered without walking back up the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNode {
    Region {
        name: String,
        error: Option<String>,
        children: Vec<ViewNode>,
    },
    Vpc {
        id: String,
        name: String,
        cidr: String,
        region: String,
        children: Vec<ViewNode>,
    },
    Subnet {
        id: String,
        name: String,
        cidr: String,
        az: String,
        region: String,
        children: Vec<ViewNode>,
    },
    Instance {
        instance: Instance,
        region: String,
    },
    SecurityGroup {
        group: SecurityGroupSummary,
        region: String,
    },
}

impl ViewNode {
    /// Stable identifier used for expansion bookkeeping.
    #[must_use]
    pub fn node_id(&self) -> String {
        match self {
            Self::Region { name, .. } => format!("region:{name}"),
            Self::Vpc { id, .. } => format!("vpc:{id}"),
            Self::Subnet { id, .. } => format!("subnet:{id}"),
            Self::Instance { instance, .. } => format!("instance:{}", instance.id),
            Self::SecurityGroup { group, .. } => format!("sg:{}", group.id),
        }
    }

    /// Child nodes; empty for leaf variants.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Region { children, .. }
            | Self::Vpc { children, .. }
            | Self::Subnet { children, .. } => children,
            Self::Instance { .. } | Self::SecurityGroup { .. } => &[],
        }
    }

    /// Whether this node can carry children in principle (container kinds).
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(
            self,
            Self::Region { .. } | Self::Vpc { .. } | Self::Subnet { .. }
        )
    }
}

/// One row of a flat projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatRow {
    Instance(InstanceRow),
    Subnet(SubnetRow),
}

/// An instance with its ancestor context attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRow {
    pub instance: Instance,
    pub az: String,
    pub vpc_id: String,
    pub vpc_name: String,
    pub subnet_name: String,
    pub region: String,
}

/// A subnet with its ancestor context and a computed instance count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetRow {
    pub subnet: Subnet,
    pub vpc_id: String,
    pub vpc_name: String,
    pub region: String,
    pub instance_count: usize,
}

/// Memoized projection keyed on (snapshot content hash, filter).
///
/// Correctness never depends on this cache; it only avoids rebuilding the
/// same projection on every render frame.
#[derive(Debug, Default)]
pub struct ProjectionCache {
    key: Option<(u64, ResourceFilter)>,
    value: Option<Projection>,
}

impl ProjectionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the projection for (inventory, filter), recomputing only when the
    /// cache key changed.
    pub fn get(&mut self, inventory: &[Region], filter: ResourceFilter) -> &Projection {
        let key = (content_hash(inventory), filter);
        if self.key != Some(key) || self.value.is_none() {
            self.value = Some(project(inventory, filter));
            self.key = Some(key);
        }
        self.value.as_ref().expect("cache populated above")
    }

    /// Drop the cached projection, forcing recomputation on next access.
    pub fn invalidate(&mut self) {
        self.key = None;
        self.value = None;
    }
}
