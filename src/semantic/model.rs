//! In-memory semantic model.
//!
//! The `Model` stores elements by ID. Ownership is recorded on both sides:
//! the child knows its owner and containing feature, the owner lists the
//! child in that feature. Cross references live in separate reference
//! features.
//!
//! ```text
//! Model
//! ├── elements: IndexMap<ElementId, Element>  (preserves insertion order)
//! ├── roots: Vec<ElementId>
//! └── changes: ChangeTracker
//! ```

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::access::SemanticModel;
use super::editing::ChangeTracker;
use super::kind::{
    ElementKind, accepts_in_feature, default_containment_feature, is_containment_feature,
};
use crate::base::ElementId;
use crate::error::SyncError;

// ============================================================================
// ELEMENT
// ============================================================================

/// A semantic model element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Metaclass.
    pub kind: ElementKind,
    /// Declared name (None for anonymous elements).
    pub name: Option<SmolStr>,
    /// Containing element (None for roots and detached elements).
    pub owner: Option<ElementId>,
    /// Feature of the owner holding this element.
    pub containing_feature: Option<SmolStr>,
    /// Containment features, in declaration order.
    pub contents: IndexMap<SmolStr, Vec<ElementId>>,
    /// Cross-reference features.
    pub references: IndexMap<SmolStr, Vec<ElementId>>,
    /// Set for classes of a metamodel library (displayed through imports).
    pub is_metaclass: bool,
    /// Set for elements that must not be mutated (library content).
    pub read_only: bool,
}

impl Element {
    /// Create a new element with the given ID and kind.
    pub fn new(id: impl Into<ElementId>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
            name: None,
            owner: None,
            containing_feature: None,
            contents: IndexMap::new(),
            references: IndexMap::new(),
            is_metaclass: false,
            read_only: false,
        }
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<SmolStr>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a cross reference.
    pub fn with_reference(mut self, feature: &str, target: impl Into<ElementId>) -> Self {
        self.references
            .entry(SmolStr::new(feature))
            .or_default()
            .push(target.into());
        self
    }

    /// Mark as a metaclass.
    pub fn as_metaclass(mut self) -> Self {
        self.is_metaclass = true;
        self
    }

    /// Mark as read-only.
    pub fn as_read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Elements held by a containment feature.
    pub fn owned(&self, feature: &str) -> &[ElementId] {
        self.contents.get(feature).map_or(&[], Vec::as_slice)
    }

    /// Elements held by a reference feature.
    pub fn referenced(&self, feature: &str) -> &[ElementId] {
        self.references.get(feature).map_or(&[], Vec::as_slice)
    }

    /// First element of a reference feature.
    pub fn first_referenced(&self, feature: &str) -> Option<&ElementId> {
        self.referenced(feature).first()
    }

    /// All directly contained elements, feature by feature.
    pub fn owned_elements(&self) -> impl DoubleEndedIterator<Item = &ElementId> {
        self.contents.values().flatten()
    }

    /// Display label: the name, or the metaclass between guillemets.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("«{}»", self.kind),
        }
    }
}

// ============================================================================
// MODEL
// ============================================================================

/// A complete UML model held in memory.
///
/// The builder methods (`add_root`, `add_child`, `add_owned`) do not record
/// changes; every [`SemanticModel`] mutation does.
#[derive(Clone, Debug, Default)]
pub struct Model {
    /// All elements by ID (IndexMap preserves insertion order).
    pub elements: IndexMap<ElementId, Element>,
    /// Root element IDs.
    pub roots: Vec<ElementId>,
    changes: ChangeTracker,
}

impl Model {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root element.
    pub fn add_root(&mut self, element: Element) -> ElementId {
        let id = element.id.clone();
        self.roots.push(id.clone());
        self.elements.insert(id.clone(), element);
        id
    }

    /// Add `element` to the containment feature `owner.feature`.
    pub fn add_child(
        &mut self,
        owner: &ElementId,
        feature: &str,
        mut element: Element,
    ) -> Result<ElementId, SyncError> {
        let owner_kind = self
            .get(owner)
            .ok_or_else(|| SyncError::UnknownElement(owner.clone()))?
            .kind;
        if !accepts_in_feature(owner_kind, feature, element.kind) {
            return Err(SyncError::invalid_feature(owner, feature));
        }
        let id = element.id.clone();
        element.owner = Some(owner.clone());
        element.containing_feature = Some(SmolStr::new(feature));
        if let Some(parent) = self.elements.get_mut(owner) {
            parent
                .contents
                .entry(SmolStr::new(feature))
                .or_default()
                .push(id.clone());
        }
        self.elements.insert(id.clone(), element);
        Ok(id)
    }

    /// Add `element` to the default containment feature of `owner`.
    pub fn add_owned(&mut self, owner: &ElementId, element: Element) -> Result<ElementId, SyncError> {
        let owner_kind = self
            .get(owner)
            .ok_or_else(|| SyncError::UnknownElement(owner.clone()))?
            .kind;
        let feature = default_containment_feature(owner_kind, element.kind)
            .ok_or_else(|| SyncError::invalid_feature(owner, element.kind.name()))?;
        self.add_child(owner, feature, element)
    }

    /// Get an element by ID.
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Get a mutable element by ID.
    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    /// Iterate over all elements.
    pub fn iter_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Get the number of elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Find elements by name.
    pub fn find_by_name(&self, name: &str) -> Vec<&Element> {
        self.elements
            .values()
            .filter(|e| e.name.as_deref() == Some(name))
            .collect()
    }

    /// Find elements of exactly `kind`.
    pub fn find_by_kind(&self, kind: ElementKind) -> Vec<&Element> {
        self.elements.values().filter(|e| e.kind == kind).collect()
    }

    /// All elements transitively contained by `id` (depth-first, excluding `id`).
    pub fn descendants(&self, id: &ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut stack: Vec<ElementId> = match self.get(id) {
            Some(e) => e.owned_elements().rev().cloned().collect(),
            None => return result,
        };
        while let Some(current) = stack.pop() {
            if let Some(e) = self.get(&current) {
                stack.extend(e.owned_elements().rev().cloned());
            }
            result.push(current);
        }
        result
    }

    /// Changes recorded since the last [`SemanticModel::take_changes`].
    pub fn changes(&self) -> &ChangeTracker {
        &self.changes
    }

    /// Remove `id` from the feature of its owner that contains it.
    fn detach(&mut self, id: &ElementId) {
        let Some((owner_id, feature)) = self
            .get(id)
            .and_then(|e| Some((e.owner.clone()?, e.containing_feature.clone()?)))
        else {
            self.roots.retain(|r| r != id);
            return;
        };
        if let Some(owner) = self.elements.get_mut(&owner_id) {
            if let Some(list) = owner.contents.get_mut(&feature) {
                list.retain(|child| child != id);
            }
            self.changes.mark_dirty(&owner_id);
        }
        if let Some(element) = self.elements.get_mut(id) {
            element.owner = None;
            element.containing_feature = None;
        }
    }

    fn ensure_editable(&self, id: &ElementId) -> Result<(), SyncError> {
        if self.get(id).is_none() {
            return Err(SyncError::UnknownElement(id.clone()));
        }
        if !self.is_editable(id) {
            return Err(SyncError::NotEditable(id.clone()));
        }
        Ok(())
    }
}

impl SemanticModel for Model {
    fn resolve(&self, id: &ElementId) -> Option<&Element> {
        self.get(id)
    }

    fn is_editable(&self, id: &ElementId) -> bool {
        let mut current = self.get(id);
        while let Some(element) = current {
            if element.read_only {
                return false;
            }
            current = element.owner.as_ref().and_then(|o| self.get(o));
        }
        self.get(id).is_some()
    }

    fn add_to_feature(
        &mut self,
        owner: &ElementId,
        feature: &str,
        element: &ElementId,
    ) -> Result<(), SyncError> {
        self.ensure_editable(owner)?;
        let owner_kind = self
            .get(owner)
            .ok_or_else(|| SyncError::UnknownElement(owner.clone()))?
            .kind;
        let child_kind = self
            .get(element)
            .ok_or_else(|| SyncError::UnknownElement(element.clone()))?
            .kind;

        if is_containment_feature(owner_kind, feature) {
            if !accepts_in_feature(owner_kind, feature, child_kind) {
                return Err(SyncError::invalid_feature(owner, feature));
            }
            if self.is_ancestor(element, owner) || element == owner {
                return Err(SyncError::invalid_feature(owner, feature));
            }
            self.detach(element);
            self.roots.retain(|r| r != element);
            if let Some(parent) = self.elements.get_mut(owner) {
                parent
                    .contents
                    .entry(SmolStr::new(feature))
                    .or_default()
                    .push(element.clone());
            }
            if let Some(child) = self.elements.get_mut(element) {
                child.owner = Some(owner.clone());
                child.containing_feature = Some(SmolStr::new(feature));
            }
            self.changes.mark_dirty(element);
        } else if let Some(parent) = self.elements.get_mut(owner) {
            let list = parent.references.entry(SmolStr::new(feature)).or_default();
            if !list.contains(element) {
                list.push(element.clone());
            }
        }
        self.changes.mark_dirty(owner);
        Ok(())
    }

    fn remove_from_feature(
        &mut self,
        owner: &ElementId,
        feature: &str,
        element: &ElementId,
    ) -> Result<(), SyncError> {
        self.ensure_editable(owner)?;
        let parent = self
            .get(owner)
            .ok_or_else(|| SyncError::UnknownElement(owner.clone()))?;

        if parent.owned(feature).contains(element) {
            self.detach(element);
            self.changes.mark_dirty(element);
        } else if parent.referenced(feature).contains(element) {
            if let Some(parent) = self.elements.get_mut(owner) {
                if let Some(list) = parent.references.get_mut(feature) {
                    list.retain(|r| r != element);
                }
            }
            self.changes.mark_dirty(owner);
        } else {
            return Err(SyncError::invalid_feature(owner, feature));
        }
        Ok(())
    }

    fn create_element(
        &mut self,
        kind: ElementKind,
        owner: &ElementId,
        feature: &str,
    ) -> Result<ElementId, SyncError> {
        if kind.is_abstract() {
            return Err(SyncError::Description(format!(
                "cannot instantiate abstract metaclass {kind}"
            )));
        }
        self.ensure_editable(owner)?;
        let id = self.add_child(owner, feature, Element::new(ElementId::generate(), kind))?;
        self.changes.mark_created(&id);
        self.changes.mark_dirty(owner);
        Ok(id)
    }

    fn delete_element(&mut self, id: &ElementId) -> Result<Vec<ElementId>, SyncError> {
        self.ensure_editable(id)?;
        let mut deleted = vec![id.clone()];
        deleted.extend(self.descendants(id));

        self.detach(id);
        self.roots.retain(|r| r != id);
        for removed in &deleted {
            self.elements.shift_remove(removed);
        }

        let mut touched = Vec::new();
        for element in self.elements.values_mut() {
            let mut changed = false;
            for targets in element.references.values_mut() {
                let before = targets.len();
                targets.retain(|t| !deleted.contains(t));
                changed |= targets.len() != before;
            }
            if changed {
                touched.push(element.id.clone());
            }
        }
        for id in &touched {
            self.changes.mark_dirty(id);
        }
        for removed in &deleted {
            self.changes.mark_removed(removed);
        }
        tracing::debug!(root = %id, count = deleted.len(), "deleted semantic elements");
        Ok(deleted)
    }

    fn set_references(
        &mut self,
        owner: &ElementId,
        feature: &str,
        targets: Vec<ElementId>,
    ) -> Result<(), SyncError> {
        self.ensure_editable(owner)?;
        let owner_kind = self
            .get(owner)
            .ok_or_else(|| SyncError::UnknownElement(owner.clone()))?
            .kind;
        if is_containment_feature(owner_kind, feature) {
            return Err(SyncError::invalid_feature(owner, feature));
        }
        if let Some(element) = self.elements.get_mut(owner) {
            element.references.insert(SmolStr::new(feature), targets);
        }
        self.changes.mark_dirty(owner);
        Ok(())
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &Element> + '_> {
        Box::new(self.elements.values())
    }

    fn take_changes(&mut self) -> ChangeTracker {
        std::mem::take(&mut self.changes)
    }
}
