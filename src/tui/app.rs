//! Application state for the explorer TUI.

use crate::config::AppConfig;
use crate::model::Region;
use crate::projection::{FlatRow, ProjectionCache, ResourceFilter, ViewNode};
use crate::scan::{load_inventory_file, INVENTORY_UNAVAILABLE};
use crate::tui::viewmodel::{ExpansionPolicy, SelectionController};
use crate::tui::widgets::{visible_nodes, TreeState};
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Rows jumped by `PageUp`/`PageDown`.
pub const PAGE_SIZE: usize = 10;

/// Where rescans get their data from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventorySource {
    /// The configured HTTP scan endpoint.
    Endpoint,
    /// A local JSON snapshot, mostly for offline use and demos.
    File(PathBuf),
}

/// State for the explorer.
pub struct TopoApp {
    pub config: AppConfig,
    pub source: InventorySource,

    /// Current snapshot. Replaced wholesale on successful rescan only; a
    /// failed rescan leaves the previous snapshot on screen.
    pub inventory: Vec<Region>,
    pub filter: ResourceFilter,
    pub expansion: ExpansionPolicy,
    pub selection: SelectionController,

    /// Cursor and scroll shared by tree and flat views.
    pub cursor: TreeState,
    pub cache: ProjectionCache,

    pub last_scan: Option<DateTime<Local>>,
    pub status_message: Option<String>,
    pub show_help: bool,
    pub should_quit: bool,
    pub tick: u64,
}

impl TopoApp {
    #[must_use]
    pub fn new(
        config: AppConfig,
        inventory: Vec<Region>,
        filter: ResourceFilter,
        source: InventorySource,
    ) -> Self {
        let last_scan = if inventory.is_empty() {
            None
        } else {
            Some(Local::now())
        };
        Self {
            config,
            source,
            inventory,
            filter,
            expansion: ExpansionPolicy::for_filter(filter),
            selection: SelectionController::new(),
            cursor: TreeState::new(),
            cache: ProjectionCache::new(),
            last_scan,
            status_message: None,
            show_help: false,
            should_quit: false,
            tick: 0,
        }
    }

    /// Switch to a different filter, replacing the expansion policy and
    /// resetting the cursor. A no-op when the filter is unchanged.
    pub fn set_filter(&mut self, filter: ResourceFilter) {
        if filter == self.filter {
            return;
        }
        self.filter = filter;
        self.expansion = ExpansionPolicy::for_filter(filter);
        self.cursor = TreeState::new();
    }

    pub fn next_filter(&mut self) {
        self.set_filter(self.filter.next());
    }

    pub fn prev_filter(&mut self) {
        self.set_filter(self.filter.prev());
    }

    /// Number of rows the current projection puts on screen.
    pub fn row_count(&mut self) -> usize {
        let projection = self.cache.get(&self.inventory, self.filter);
        if self.filter.is_tree() {
            visible_nodes(projection.roots(), &self.expansion).len()
        } else {
            projection.rows().len()
        }
    }

    pub fn navigate_down(&mut self) {
        let count = self.row_count();
        self.cursor.clamp(count);
        self.cursor.select_next();
    }

    pub fn navigate_up(&mut self) {
        let count = self.row_count();
        self.cursor.clamp(count);
        self.cursor.select_prev();
    }

    pub fn page_down(&mut self) {
        for _ in 0..PAGE_SIZE {
            self.navigate_down();
        }
    }

    pub fn page_up(&mut self) {
        for _ in 0..PAGE_SIZE {
            self.navigate_up();
        }
    }

    pub fn go_first(&mut self) {
        self.cursor.select_first();
    }

    pub fn go_last(&mut self) {
        let count = self.row_count();
        self.cursor.clamp(count);
        self.cursor.select_last();
    }

    /// Act on the row under the cursor: toggle containers where the policy
    /// allows it, select instances for the detail panel.
    pub fn handle_enter(&mut self) {
        if self.filter.is_tree() {
            let projection = self.cache.get(&self.inventory, self.filter);
            let rows = visible_nodes(projection.roots(), &self.expansion);
            let Some(row) = rows.get(self.cursor.selected) else {
                return;
            };
            match row.node {
                ViewNode::Instance { instance, .. } => {
                    // Enter on the already-selected instance closes the panel.
                    if self.selection.is_selected(&instance.id) {
                        self.selection.clear();
                    } else {
                        let instance = instance.clone();
                        self.selection.select(&instance);
                    }
                }
                node if node.is_container() => {
                    let node_id = node.node_id();
                    self.expansion.toggle(&node_id);
                }
                _ => {}
            }
        } else {
            let projection = self.cache.get(&self.inventory, self.filter);
            let Some(row) = projection.rows().get(self.cursor.selected) else {
                return;
            };
            match row {
                FlatRow::Instance(row) => {
                    if self.selection.is_selected(&row.instance.id) {
                        self.selection.clear();
                    } else {
                        let instance = row.instance.clone();
                        self.selection.select(&instance);
                    }
                }
                FlatRow::Subnet(_) => {}
            }
        }
    }

    /// Collapse every open node (tree views under a collapsible policy).
    pub fn collapse_all(&mut self) {
        self.expansion.collapse_all();
        self.cursor.select_first();
    }

    /// Fetch a fresh snapshot from the configured source.
    ///
    /// On failure the previous snapshot, filter state, and selection all stay
    /// exactly as they were; only the status line changes.
    pub fn rescan(&mut self) {
        match self.fetch() {
            Ok(inventory) => {
                tracing::info!(regions = inventory.len(), "Rescan complete");
                self.inventory = inventory;
                self.cache.invalidate();
                self.last_scan = Some(Local::now());
                self.status_message = None;
                let count = self.row_count();
                self.cursor.clamp(count);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rescan failed");
                self.set_status_message(INVENTORY_UNAVAILABLE);
            }
        }
    }

    fn fetch(&self) -> crate::error::Result<Vec<Region>> {
        match &self.source {
            InventorySource::File(path) => load_inventory_file(path),
            #[cfg(feature = "scan")]
            InventorySource::Endpoint => {
                let client =
                    crate::scan::ScanClient::new(crate::scan::ScanClientConfig::from(&self.config))?;
                client.fetch_inventory()
            }
            #[cfg(not(feature = "scan"))]
            InventorySource::Endpoint => Err(crate::error::TopoError::config(
                "built without the scan feature; use --input to load a snapshot",
            )),
        }
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Total instances in the current snapshot, for the header.
    #[must_use]
    pub fn total_instances(&self) -> usize {
        self.inventory.iter().map(Region::instance_count).sum()
    }

    /// Regions whose scan reported an error.
    #[must_use]
    pub fn failed_regions(&self) -> usize {
        self.inventory.iter().filter(|r| r.error.is_some()).count()
    }
}
