//! Change tracking for [`Model`](super::Model) mutations.
//!
//! Each touched element gets one [`Change`]; the strongest one wins, so a
//! created element stays created when later edited and a removed element
//! stays removed. An [`EditOutcome`](crate::sync::EditOutcome) carries the
//! tracker of the edit it describes.

use indexmap::IndexMap;

use crate::base::ElementId;

/// What happened to an element during an edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Change {
    Modified,
    Created,
    Removed,
}

/// Mutations applied to a semantic model, in first-touch order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeTracker {
    changes: IndexMap<ElementId, Change>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn change_of(&self, id: &ElementId) -> Option<Change> {
        self.changes.get(id).copied()
    }

    /// Whether `id` was modified or created and still exists.
    pub fn is_dirty(&self, id: &ElementId) -> bool {
        matches!(self.change_of(id), Some(Change::Modified | Change::Created))
    }

    pub fn is_created(&self, id: &ElementId) -> bool {
        self.change_of(id) == Some(Change::Created)
    }

    pub fn is_removed(&self, id: &ElementId) -> bool {
        self.change_of(id) == Some(Change::Removed)
    }

    /// Elements created and not removed since, in creation order.
    pub fn created_elements(&self) -> Vec<&ElementId> {
        self.changes
            .iter()
            .filter(|(_, change)| **change == Change::Created)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn mark_dirty(&mut self, id: &ElementId) {
        self.record(id, Change::Modified);
    }

    pub fn mark_created(&mut self, id: &ElementId) {
        self.record(id, Change::Created);
    }

    pub fn mark_removed(&mut self, id: &ElementId) {
        self.record(id, Change::Removed);
    }

    fn record(&mut self, id: &ElementId, change: Change) {
        let entry = self.changes.entry(id.clone()).or_insert(change);
        *entry = (*entry).max(change);
    }
}
