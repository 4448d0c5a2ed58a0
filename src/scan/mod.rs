//! Inventory acquisition: HTTP scan endpoint or local JSON file.
//!
//! Whatever the source, the result is the same wire format: a JSON array of
//! regions. The TUI never shows callers the underlying failure detail; every
//! scan error collapses into [`INVENTORY_UNAVAILABLE`] while the full chain
//! goes to the log.

#[cfg(feature = "scan")]
pub mod client;

#[cfg(feature = "scan")]
pub use client::{ScanClient, ScanClientConfig};

use crate::error::{ErrorContext, Result, TopoError};
use crate::model::Region;
use std::path::Path;

/// The single user-facing message for any failed scan. Stale data stays on
/// screen; this string goes in the status line.
pub const INVENTORY_UNAVAILABLE: &str = "inventory unavailable - is the scan endpoint running?";

/// Load an inventory snapshot from a JSON file.
pub fn load_inventory_file(path: &Path) -> Result<Vec<Region>> {
    let content = std::fs::read_to_string(path).map_err(|e| TopoError::io(path, e))?;
    let inventory: Vec<Region> = serde_json::from_str(&content)
        .map_err(TopoError::from)
        .with_context(|| format!("reading inventory from {}", path.display()))?;
    Ok(inventory)
}
