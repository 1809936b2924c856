//! Drop reconciliation.
//!
//! - [`semantic`]: an element dragged from outside the diagram is displayed.
//! - [`graphical`]: a node dragged inside the diagram moves, together with
//!   its semantic element.
//!
//! Semantic drops dispatch on a [`DropCategory`] computed once per element.

pub mod behavior;
pub mod graphical;
pub mod semantic;

use crate::base::ElementId;
use crate::description::MappingVariant;
use crate::semantic::{EdgeCategory, Element, ElementKind, SemanticModel};

pub use behavior::{
    DropBehaviorRegistry, DropChecker, DropProvider, DropRequest, EditabilityChecker,
    FeatureSwitchProvider,
};
pub use graphical::{DropDecision, GraphicalDropPlan, plan_graphical_drop};
pub use semantic::drop_semantic;

/// How a semantic drop displays an element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropCategory {
    /// Displayed as a domain-based edge; endpoints are displayed first.
    Edge(EdgeCategory),
    /// An element import of a metaclass: the metaclass is displayed with
    /// the metaclass mapping variant.
    MetaclassImport(ElementId),
    /// Displayed as a node with a type-based mapping.
    Node(MappingVariant),
}

impl DropCategory {
    /// The category of `element`.
    pub fn of(model: &dyn SemanticModel, element: &Element) -> Self {
        if element.kind == ElementKind::ElementImport {
            if let Some(imported) = element
                .first_referenced("importedElement")
                .and_then(|id| model.resolve(id))
                .filter(|e| e.is_metaclass)
            {
                return Self::MetaclassImport(imported.id.clone());
            }
        }
        if let Some(category) = element.kind.edge_category() {
            return Self::Edge(category);
        }
        if element.is_metaclass {
            Self::Node(MappingVariant::Metaclass)
        } else {
            Self::Node(MappingVariant::Default)
        }
    }
}
