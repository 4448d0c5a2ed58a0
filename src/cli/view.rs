//! The `view` command: launch the explorer TUI.

use crate::config::AppConfig;
use crate::error::Result;
use crate::model::Region;
use crate::projection::ResourceFilter;
use crate::scan::{load_inventory_file, INVENTORY_UNAVAILABLE};
use crate::tui::{run_tui, InventorySource, TopoApp};
use std::path::PathBuf;

/// Options for the `view` command.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    /// Load this snapshot file instead of scanning the endpoint.
    pub input: Option<PathBuf>,
    /// Filter to start in.
    pub filter: ResourceFilter,
    /// Skip the initial scan and start with an empty inventory.
    pub offline: bool,
}

/// Run the explorer TUI. Returns once the user quits.
pub fn run_view(config: AppConfig, options: ViewOptions) -> Result<()> {
    let source = options.input.clone().map_or(InventorySource::Endpoint, InventorySource::File);

    // A failed initial scan is not fatal: the TUI starts empty with the
    // coalesced message and the user can rescan with `r`.
    let (inventory, scan_failed) = if options.offline {
        (Vec::new(), false)
    } else {
        match initial_inventory(&config, &options) {
            Ok(inventory) => (inventory, false),
            Err(e) => {
                tracing::warn!(error = %e, "Initial scan failed");
                (Vec::new(), true)
            }
        }
    };

    let mut app = TopoApp::new(config, inventory, options.filter, source);
    if scan_failed {
        app.set_status_message(INVENTORY_UNAVAILABLE);
        app.last_scan = None;
    }

    run_tui(&mut app).map_err(|e| crate::error::TopoError::Terminal(e.to_string()))?;
    Ok(())
}

fn initial_inventory(config: &AppConfig, options: &ViewOptions) -> Result<Vec<Region>> {
    if let Some(path) = &options.input {
        return load_inventory_file(path);
    }

    #[cfg(feature = "scan")]
    {
        let client = crate::scan::ScanClient::new(crate::scan::ScanClientConfig::from(config))?;
        client.fetch_inventory()
    }
    #[cfg(not(feature = "scan"))]
    {
        let _ = config;
        Err(crate::error::TopoError::config(
            "built without the scan feature; use --input to load a snapshot",
        ))
    }
}
