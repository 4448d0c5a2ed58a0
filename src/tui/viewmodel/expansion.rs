//! Expansion state for tree projections.

use crate::projection::ResourceFilter;
use std::collections::HashSet;

/// How node expansion behaves under the active filter.
///
/// The policy is owned by the view and replaced wholesale on every filter
/// change, so open-node state never leaks across filters: returning to the
/// full tree always starts collapsed again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionPolicy {
    /// Everything starts closed; the user opens nodes one by one.
    Collapsed { open: HashSet<String> },
    /// Every container renders open; toggling is a no-op.
    ExpandAll,
    /// Flat views: expansion has no meaning.
    Irrelevant,
}

impl ExpansionPolicy {
    /// The policy the given filter starts with.
    #[must_use]
    pub fn for_filter(filter: ResourceFilter) -> Self {
        match filter {
            ResourceFilter::All => Self::Collapsed {
                open: HashSet::new(),
            },
            ResourceFilter::Vpc | ResourceFilter::SecurityGroup => Self::ExpandAll,
            ResourceFilter::Subnet | ResourceFilter::Instance => Self::Irrelevant,
        }
    }

    /// Whether the node with this id renders its children.
    #[must_use]
    pub fn is_open(&self, node_id: &str) -> bool {
        match self {
            Self::Collapsed { open } => open.contains(node_id),
            Self::ExpandAll => true,
            Self::Irrelevant => false,
        }
    }

    /// Flip a node's open state. Only meaningful under `Collapsed`.
    pub fn toggle(&mut self, node_id: &str) {
        if let Self::Collapsed { open } = self {
            if !open.remove(node_id) {
                open.insert(node_id.to_string());
            }
        }
    }

    /// Close every node. Only meaningful under `Collapsed`.
    pub fn collapse_all(&mut self) {
        if let Self::Collapsed { open } = self {
            open.clear();
        }
    }

    /// Whether the user can toggle nodes at all.
    #[must_use]
    pub const fn allows_toggling(&self) -> bool {
        matches!(self, Self::Collapsed { .. })
    }
}
