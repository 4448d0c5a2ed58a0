//! The `scan` command: one-shot inventory fetch for scripts and pipelines.

use crate::config::AppConfig;
use crate::error::{Result, TopoError};
use crate::model::Region;
use crate::scan::load_inventory_file;
use std::io::Write;
use std::path::PathBuf;

/// Output format for the `scan` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ScanOutput {
    /// Pretty-printed inventory JSON, suitable for `--input` later.
    #[default]
    Json,
    /// One line per region with resource counts.
    Summary,
}

/// Fetch one snapshot and write it out. Returns the number of regions that
/// reported a scan error, for the caller's exit code.
pub fn run_scan(
    config: &AppConfig,
    input: Option<&PathBuf>,
    output: ScanOutput,
    output_file: Option<&PathBuf>,
) -> Result<usize> {
    let inventory = match input {
        Some(path) => load_inventory_file(path)?,
        None => fetch(config)?,
    };

    let rendered = match output {
        ScanOutput::Json => serde_json::to_string_pretty(&inventory).map_err(TopoError::from)?,
        ScanOutput::Summary => render_summary(&inventory),
    };

    match output_file {
        Some(path) => {
            std::fs::write(path, rendered.as_bytes()).map_err(|e| TopoError::io(path, e))?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{rendered}")?;
        }
    }

    Ok(inventory.iter().filter(|r| r.error.is_some()).count())
}

fn fetch(config: &AppConfig) -> Result<Vec<Region>> {
    #[cfg(feature = "scan")]
    {
        let client = crate::scan::ScanClient::new(crate::scan::ScanClientConfig::from(config))?;
        client.fetch_inventory()
    }
    #[cfg(not(feature = "scan"))]
    {
        let _ = config;
        Err(TopoError::config(
            "built without the scan feature; use --input to load a snapshot",
        ))
    }
}

fn render_summary(inventory: &[Region]) -> String {
    let mut lines = Vec::with_capacity(inventory.len() + 1);
    for region in inventory {
        match &region.error {
            Some(error) => lines.push(format!("{}: scan failed ({error})", region.region)),
            None => lines.push(format!(
                "{}: {} VPCs, {} subnets, {} instances",
                region.region,
                region.vpcs.len(),
                region.subnet_count(),
                region.instance_count()
            )),
        }
    }
    let totals = format!(
        "total: {} regions, {} instances",
        inventory.len(),
        inventory.iter().map(Region::instance_count).sum::<usize>()
    );
    lines.push(totals);
    lines.join("\n")
}
