//! Terminal UI for exploring the topology inventory.
//!
//! The view layer is a thin shell over the projection engine: every frame
//! renders whatever `ProjectionCache` returns for the current (snapshot,
//! filter) pair, and input handlers only mutate view state.

pub mod app;
pub mod events;
pub mod theme;
pub mod ui;
pub mod viewmodel;
pub mod widgets;

pub use app::{InventorySource, TopoApp};
pub use theme::{colors, set_theme, toggle_theme, Theme};
pub use ui::run_tui;
