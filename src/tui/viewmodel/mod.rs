//! View-side state that is derived from user interaction rather than from
//! the inventory itself.

mod expansion;
mod selection;

pub use expansion::ExpansionPolicy;
pub use selection::SelectionController;
