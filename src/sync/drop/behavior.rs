//! Pluggable checks and model changes for graphical drops.
//!
//! A diagram type can register its own [`DropChecker`] / [`DropProvider`]
//! pair. Diagram types without a registration use the defaults: an
//! editability check and a containment feature switch.

use rustc_hash::FxHashMap;

use crate::base::{DescriptionId, ElementId};
use crate::error::SyncError;
use crate::semantic::kind::accepts_in_feature;
use crate::semantic::{ElementKind, SemanticModel};

/// A graphical drop of `element` from `old_container` to `new_container`
/// (semantic containers, as displayed by the old and new parent views).
#[derive(Clone, Copy, Debug)]
pub struct DropRequest<'a> {
    pub element: &'a ElementId,
    pub old_container: &'a ElementId,
    pub new_container: &'a ElementId,
}

impl DropRequest<'_> {
    /// Whether the drop keeps the element in the same semantic container.
    pub fn is_same_container(&self) -> bool {
        self.old_container == self.new_container
    }
}

/// Decides whether a graphical drop is allowed. Must not mutate anything.
pub trait DropChecker {
    fn check(&self, model: &dyn SemanticModel, request: &DropRequest<'_>) -> Result<(), SyncError>;
}

/// Applies the semantic side of an allowed graphical drop.
///
/// Implementations validate before their first mutation so that an error
/// leaves the model untouched.
pub trait DropProvider {
    fn apply(
        &self,
        model: &mut dyn SemanticModel,
        request: &DropRequest<'_>,
    ) -> Result<(), SyncError>;
}

// ============================================================================
// DEFAULTS
// ============================================================================

/// Requires the element and both containers to be editable.
#[derive(Clone, Copy, Debug, Default)]
pub struct EditabilityChecker;

impl DropChecker for EditabilityChecker {
    fn check(&self, model: &dyn SemanticModel, request: &DropRequest<'_>) -> Result<(), SyncError> {
        if request.is_same_container() {
            return Ok(());
        }
        let element = model
            .resolve(request.element)
            .ok_or_else(|| SyncError::UnknownElement(request.element.clone()))?;
        // Metaclasses live in read-only libraries; only their import moves.
        let element_checked = (!element.is_metaclass).then_some(request.element);
        for id in element_checked
            .into_iter()
            .chain([request.old_container, request.new_container])
        {
            if model.resolve(id).is_none() {
                return Err(SyncError::UnknownElement(id.clone()));
            }
            if !model.is_editable(id) {
                return Err(SyncError::invalid_drop(format!(
                    "{} is not editable",
                    label(model, id)
                )));
            }
        }
        Ok(())
    }
}

/// Moves the element into the same containment feature of the new
/// container. Metaclasses are not moved: the element import displaying
/// them is.
#[derive(Clone, Copy, Debug, Default)]
pub struct FeatureSwitchProvider;

impl FeatureSwitchProvider {
    /// The element to move and the feature receiving it.
    fn plan(
        &self,
        model: &dyn SemanticModel,
        request: &DropRequest<'_>,
    ) -> Result<(ElementId, String), SyncError> {
        let element = model
            .resolve(request.element)
            .ok_or_else(|| SyncError::UnknownElement(request.element.clone()))?;
        let new_kind = model
            .resolve(request.new_container)
            .map(|e| e.kind)
            .ok_or_else(|| SyncError::UnknownElement(request.new_container.clone()))?;

        if element.is_metaclass {
            let import = model
                .resolve(request.old_container)
                .into_iter()
                .flat_map(|c| c.owned("elementImport"))
                .find(|i| {
                    model
                        .resolve(i)
                        .and_then(|i| i.first_referenced("importedElement"))
                        == Some(request.element)
                })
                .cloned()
                .ok_or_else(|| {
                    SyncError::invalid_drop(format!(
                        "{} is not imported by {}",
                        element.label(),
                        label(model, request.old_container)
                    ))
                })?;
            if !accepts_in_feature(new_kind, "elementImport", ElementKind::ElementImport) {
                return Err(SyncError::invalid_drop(format!(
                    "{} cannot import {}",
                    label(model, request.new_container),
                    element.label()
                )));
            }
            return Ok((import, "elementImport".to_string()));
        }

        let feature = element.containing_feature.clone().ok_or_else(|| {
            SyncError::invalid_drop(format!("{} has no container", element.label()))
        })?;
        if element.owner.as_ref() != Some(request.old_container) {
            return Err(SyncError::invalid_drop(format!(
                "{} is not contained by {}",
                element.label(),
                label(model, request.old_container)
            )));
        }
        if !accepts_in_feature(new_kind, &feature, element.kind) {
            return Err(SyncError::invalid_drop(format!(
                "{} cannot contain {} in '{feature}'",
                label(model, request.new_container),
                element.label()
            )));
        }
        if model.is_ancestor(request.element, request.new_container) {
            return Err(SyncError::invalid_drop(format!(
                "{} cannot be moved into its own content",
                element.label()
            )));
        }
        Ok((request.element.clone(), feature.to_string()))
    }
}

impl DropProvider for FeatureSwitchProvider {
    fn apply(
        &self,
        model: &mut dyn SemanticModel,
        request: &DropRequest<'_>,
    ) -> Result<(), SyncError> {
        if request.is_same_container() {
            return Ok(());
        }
        let (moved, feature) = self.plan(model, request)?;
        model.remove_from_feature(request.old_container, &feature, &moved)?;
        model.add_to_feature(request.new_container, &feature, &moved)?;
        tracing::debug!(element = %moved, feature, to = %request.new_container, "element moved");
        Ok(())
    }
}

fn label(model: &dyn SemanticModel, id: &ElementId) -> String {
    model
        .resolve(id)
        .map_or_else(|| id.to_string(), |e| e.label())
}

// ============================================================================
// REGISTRY
// ============================================================================

struct DropBehavior {
    checker: Box<dyn DropChecker>,
    provider: Box<dyn DropProvider>,
}

/// Checker/provider pairs by diagram type.
pub struct DropBehaviorRegistry {
    behaviors: FxHashMap<DescriptionId, DropBehavior>,
    default: DropBehavior,
}

impl Default for DropBehaviorRegistry {
    fn default() -> Self {
        Self {
            behaviors: FxHashMap::default(),
            default: DropBehavior {
                checker: Box::new(EditabilityChecker),
                provider: Box::new(FeatureSwitchProvider),
            },
        }
    }
}

impl std::fmt::Debug for DropBehaviorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropBehaviorRegistry")
            .field("registered", &self.behaviors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl DropBehaviorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the behavior of a diagram type, replacing any previous one.
    pub fn register(
        &mut self,
        description: impl Into<DescriptionId>,
        checker: impl DropChecker + 'static,
        provider: impl DropProvider + 'static,
    ) {
        self.behaviors.insert(
            description.into(),
            DropBehavior {
                checker: Box::new(checker),
                provider: Box::new(provider),
            },
        );
    }

    fn behavior(&self, description: &DescriptionId) -> &DropBehavior {
        self.behaviors.get(description).unwrap_or(&self.default)
    }

    pub fn checker(&self, description: &DescriptionId) -> &dyn DropChecker {
        self.behavior(description).checker.as_ref()
    }

    pub fn provider(&self, description: &DescriptionId) -> &dyn DropProvider {
        self.behavior(description).provider.as_ref()
    }
}
