//! Custom widgets for the explorer UI.

pub mod tree;

pub use tree::{visible_nodes, TopologyTree, TreeState, VisibleNode};
