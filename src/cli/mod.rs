//! Command implementations for the toposcope binary.

mod scan;
mod view;

pub use scan::{run_scan, ScanOutput};
pub use view::{run_view, ViewOptions};
