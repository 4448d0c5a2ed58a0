//! Inventory data model.
//!
//! The inventory is a pure value: a list of [`Region`]s as returned by one
//! scan of the backend. It is replaced wholesale on every rescan and never
//! patched in place, so readers always observe one consistent snapshot.

mod inventory;

pub use inventory::{
    content_hash, Instance, Region, SecurityGroupSummary, SecurityRule, Subnet, Vpc,
};
