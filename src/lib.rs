//! toposcope: terminal cloud network topology explorer.
//!
//! The crate is built around a pure projection engine: one inventory
//! snapshot (a list of [`model::Region`]s) plus one [`projection::ResourceFilter`]
//! deterministically produce either a tree or a flat row set, and the TUI is
//! a thin shell that renders whatever the engine returns. Acquisition (HTTP
//! scan endpoint or local JSON file) is isolated in [`scan`] and feature-gated
//! where it pulls in a network stack.

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod projection;
pub mod scan;
pub mod tui;

pub use error::{Result, TopoError};
