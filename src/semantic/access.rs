//! The semantic-model collaborator interface.

use super::editing::ChangeTracker;
use super::kind::ElementKind;
use super::model::Element;
use crate::base::ElementId;
use crate::error::SyncError;

/// Read and mutation access to the semantic model a diagram represents.
///
/// The synchronization core never touches the model except through this
/// trait. Mutations are feature based: adding an element to a containment
/// feature reparents it, adding it to any other feature records a cross
/// reference.
pub trait SemanticModel {
    /// Resolve an element by ID.
    fn resolve(&self, id: &ElementId) -> Option<&Element>;

    /// The ID of an element.
    fn id_of(&self, element: &Element) -> ElementId {
        element.id.clone()
    }

    /// Whether the element may be mutated.
    fn is_editable(&self, id: &ElementId) -> bool;

    /// Add `element` to `owner.feature`.
    fn add_to_feature(
        &mut self,
        owner: &ElementId,
        feature: &str,
        element: &ElementId,
    ) -> Result<(), SyncError>;

    /// Remove `element` from `owner.feature`.
    fn remove_from_feature(
        &mut self,
        owner: &ElementId,
        feature: &str,
        element: &ElementId,
    ) -> Result<(), SyncError>;

    /// Create a new element of `kind` in the containment feature `owner.feature`.
    fn create_element(
        &mut self,
        kind: ElementKind,
        owner: &ElementId,
        feature: &str,
    ) -> Result<ElementId, SyncError>;

    /// Delete an element with everything it contains, and every cross
    /// reference to the deleted elements. Returns the deleted IDs.
    fn delete_element(&mut self, id: &ElementId) -> Result<Vec<ElementId>, SyncError>;

    /// Replace the content of the reference feature `owner.feature`.
    fn set_references(
        &mut self,
        owner: &ElementId,
        feature: &str,
        targets: Vec<ElementId>,
    ) -> Result<(), SyncError>;

    /// Iterate over all elements.
    fn elements(&self) -> Box<dyn Iterator<Item = &Element> + '_>;

    /// Take the changes recorded since the last call. Models that do not
    /// track changes return an empty tracker.
    fn take_changes(&mut self) -> ChangeTracker {
        ChangeTracker::new()
    }

    // ── Provided navigation ─────────────────────────────────────────

    /// The containing element.
    fn owner_of(&self, id: &ElementId) -> Option<&Element> {
        let owner = self.resolve(id)?.owner.as_ref()?;
        self.resolve(owner)
    }

    /// The closest element of `kind` among the ancestors of `id`
    /// (starting with `id` itself when `include_self` is set).
    fn nearest_ancestor(
        &self,
        id: &ElementId,
        kind: ElementKind,
        include_self: bool,
    ) -> Option<&Element> {
        let mut current = if include_self {
            self.resolve(id)
        } else {
            self.owner_of(id)
        };
        while let Some(element) = current {
            if element.kind.is_a(kind) {
                return Some(element);
            }
            current = element.owner.as_ref().and_then(|o| self.resolve(o));
        }
        None
    }

    /// Whether `ancestor` (transitively) contains `id`.
    fn is_ancestor(&self, ancestor: &ElementId, id: &ElementId) -> bool {
        let mut current = self.owner_of(id);
        while let Some(element) = current {
            if &element.id == ancestor {
                return true;
            }
            current = element.owner.as_ref().and_then(|o| self.resolve(o));
        }
        false
    }

    /// All elements whose kind is `kind` or a subtype of it.
    fn elements_of_kind(&self, kind: ElementKind) -> Vec<&Element> {
        self.elements().filter(|e| e.kind.is_a(kind)).collect()
    }
}
