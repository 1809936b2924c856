//! Semantic drop: display an element dragged from outside the diagram.
//!
//! A semantic drop never changes the model. It requests the views needed to
//! display the element: a node at the drop target, or, for relationships,
//! the endpoint nodes the edge needs (the edge itself appears on refresh).

use crate::base::ElementId;
use crate::description::MappingVariant;
use crate::diagnostics::{Diagnostics, codes};
use crate::diagram::ViewParent;
use crate::error::SyncError;
use crate::semantic::{Element, ElementKind, SemanticModel};

use super::DropCategory;
use crate::sync::context::DiagramContext;
use crate::sync::endpoints::EdgeEndpointResolver;
use crate::sync::placement::{Placed, apply_placement, resolve_placement};

/// Graphical-only containers an activity node can be displayed in.
const GROUP_REFERENCES: &[&str] = &["inPartition", "inInterruptibleRegion"];

/// Display `element` on `target`. Returns true when views were requested.
pub fn drop_semantic(
    ctx: &mut DiagramContext<'_>,
    model: &dyn SemanticModel,
    element: &ElementId,
    target: &ViewParent,
    diagnostics: &mut Diagnostics,
) -> Result<bool, SyncError> {
    let element = model
        .resolve(element)
        .ok_or_else(|| SyncError::UnknownElement(element.clone()))?;
    if let ViewParent::Node(id) = target {
        if ctx.view(id).is_none() {
            return Err(SyncError::UnknownNode(id.clone()));
        }
    }

    let category = DropCategory::of(model, element);
    tracing::debug!(element = %element.id, ?category, %target, "semantic drop");
    let requested = match category {
        DropCategory::Edge(_) => drop_edge(ctx, model, element, diagnostics),
        DropCategory::MetaclassImport(metaclass) => {
            let kind = model
                .resolve(&metaclass)
                .map(|e| e.kind)
                .ok_or_else(|| SyncError::UnknownElement(metaclass.clone()))?;
            drop_node(ctx, &metaclass, kind, MappingVariant::Metaclass, target, diagnostics)
        }
        DropCategory::Node(variant) => {
            drop_node(ctx, &element.id, element.kind, variant, target, diagnostics)
        }
    };
    Ok(requested)
}

fn drop_node(
    ctx: &mut DiagramContext<'_>,
    element: &ElementId,
    kind: ElementKind,
    variant: MappingVariant,
    target: &ViewParent,
    diagnostics: &mut Diagnostics,
) -> bool {
    let Some(placement) = resolve_placement(ctx, kind, variant, target, diagnostics) else {
        diagnostics.warn(
            codes::UNREPRESENTABLE_ELEMENT,
            format!("{kind} {element} cannot be displayed here"),
        );
        return false;
    };
    match apply_placement(ctx, &placement, element) {
        Placed::Created(_) => true,
        Placed::AlreadyDisplayed => {
            diagnostics.warn(
                codes::DUPLICATE_VIEW,
                format!("{element} is already displayed here"),
            );
            false
        }
    }
}

fn drop_edge(
    ctx: &mut DiagramContext<'_>,
    model: &dyn SemanticModel,
    element: &Element,
    diagnostics: &mut Diagnostics,
) -> bool {
    if !ctx.diagram().edges_displaying(&element.id).is_empty() {
        diagnostics.warn(
            codes::ALREADY_REPRESENTED,
            format!("{} is already displayed", element.label()),
        );
        return false;
    }
    if ctx.description().edge_mappings_for(element.kind).is_empty() {
        diagnostics.warn(
            codes::UNREPRESENTABLE_ELEMENT,
            format!("{} cannot be displayed on this diagram", element.kind),
        );
        return false;
    }

    let resolver = EdgeEndpointResolver::new(model);
    if resolver.source(element).is_none() || resolver.targets(element).is_empty() {
        diagnostics.warn(
            codes::MISSING_ENDPOINT,
            format!("{} has no source or target", element.label()),
        );
        return false;
    }

    // Every endpoint is planned before anything is kept.
    let checkpoint = ctx.checkpoint();
    let depth = ctx.options().endpoint_container_depth;
    for endpoint in resolver.endpoints(element) {
        if !ensure_displayed(ctx, model, &endpoint, depth) {
            ctx.rollback(checkpoint);
            diagnostics.warn(
                codes::UNRESOLVED_ENDPOINT,
                format!(
                    "Cannot display {}: the container of {} is not displayed",
                    element.label(),
                    model.resolve(&endpoint).map_or_else(|| endpoint.to_string(), Element::label)
                ),
            );
            return false;
        }
    }
    true
}

/// An endpoint waiting for a view.
struct PendingEndpoint<'e> {
    id: &'e ElementId,
    kind: ElementKind,
    variant: MappingVariant,
}

impl PendingEndpoint<'_> {
    fn place_in(
        &self,
        ctx: &mut DiagramContext<'_>,
        parent: &ViewParent,
        diagnostics: &mut Diagnostics,
    ) -> bool {
        match resolve_placement(ctx, self.kind, self.variant, parent, diagnostics) {
            Some(placement) => {
                apply_placement(ctx, &placement, self.id);
                true
            }
            None => false,
        }
    }

    /// Place into any view of `container`, or on the diagram when the
    /// diagram is opened on `container`.
    fn place_in_container(
        &self,
        ctx: &mut DiagramContext<'_>,
        container: &ElementId,
        diagnostics: &mut Diagnostics,
    ) -> bool {
        let mut parents: Vec<ViewParent> = ctx
            .views_displaying(container)
            .iter()
            .map(|v| ViewParent::Node(v.id().clone()))
            .collect();
        if &ctx.diagram().target_id == container {
            parents.push(ViewParent::Diagram);
        }
        parents
            .iter()
            .any(|parent| self.place_in(ctx, parent, diagnostics))
    }
}

/// Make sure `id` has a view, requesting one (and up to `depth - 1`
/// container views) when needed. Returns false when it cannot be displayed.
fn ensure_displayed(
    ctx: &mut DiagramContext<'_>,
    model: &dyn SemanticModel,
    id: &ElementId,
    depth: usize,
) -> bool {
    if ctx.find_graphical_node(id).is_some() {
        return true;
    }
    if depth == 0 {
        return false;
    }
    let Some(element) = model.resolve(id) else {
        return false;
    };
    let endpoint = PendingEndpoint {
        id,
        kind: element.kind,
        variant: if element.is_metaclass {
            MappingVariant::Metaclass
        } else {
            MappingVariant::Default
        },
    };
    // Ambiguity notes for speculative endpoint placement are not surfaced.
    let mut scratch = Diagnostics::new();

    // Activity partitions and interruptible regions: graphical containers
    // that do not own their nodes.
    for feature in GROUP_REFERENCES {
        for group in element.referenced(feature) {
            let parents: Vec<ViewParent> = ctx
                .views_displaying(group)
                .iter()
                .map(|v| ViewParent::Node(v.id().clone()))
                .collect();
            if parents
                .iter()
                .any(|parent| endpoint.place_in(ctx, parent, &mut scratch))
            {
                return true;
            }
        }
    }

    // Metaclasses are displayed where they are imported.
    if element.is_metaclass {
        let importers: Vec<ElementId> = model
            .elements_of_kind(ElementKind::ElementImport)
            .into_iter()
            .filter(|i| i.first_referenced("importedElement") == Some(id))
            .filter_map(|i| i.owner.clone())
            .collect();
        return importers
            .iter()
            .any(|importer| endpoint.place_in_container(ctx, importer, &mut scratch));
    }

    let Some(owner) = element.owner.clone() else {
        return false;
    };
    if endpoint.place_in_container(ctx, &owner, &mut scratch) {
        return true;
    }
    depth > 1
        && ensure_displayed(ctx, model, &owner, depth - 1)
        && endpoint.place_in_container(ctx, &owner, &mut scratch)
}
