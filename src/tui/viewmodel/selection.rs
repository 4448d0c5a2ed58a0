//! Instance selection for the detail panel.

use crate::model::Instance;

/// A single selection slot holding at most one instance.
///
/// The slot owns a copy of the instance taken at selection time. It is not
/// re-resolved against later snapshots, so after a rescan the detail panel
/// may show the pre-rescan state until the user selects again.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selected: Option<Instance>,
}

impl SelectionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with a copy of the given instance. Selecting is
    /// always a set; the slot clears only through [`Self::clear`].
    pub fn select(&mut self, instance: &Instance) {
        self.selected = Some(instance.clone());
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Instance> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn is_selected(&self, instance_id: &str) -> bool {
        self.selected.as_ref().is_some_and(|s| s.id == instance_id)
    }
}
