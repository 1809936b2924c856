//! Graphical drop: move a node (and its element) to another parent view.
//!
//! ```text
//! CHECK ──► FAILED
//!   │
//!   ▼
//! ALLOWED ──► APPLY_MODEL_CHANGE ──► CREATE_VIEWS ──► DELETE_OLD_VIEW
//! ```
//!
//! Planning covers CHECK and the view requests (placement of the new node,
//! clones of every descendant view, deletion of the old subtree). Nothing
//! in the model changes until the plan is complete; the coordinator then
//! runs the [`DropProvider`](super::DropProvider) and applies the views.

use crate::base::{ElementId, MappingId, NodeId};
use crate::description::MappingVariant;
use crate::diagnostics::{Diagnostics, codes};
use crate::diagram::{Node, ViewParent};
use crate::error::SyncError;
use crate::semantic::SemanticModel;

use super::behavior::{DropChecker, DropRequest};
use crate::sync::context::DiagramContext;
use crate::sync::placement::{Placed, Placement, apply_placement, resolve_placement};

/// The semantic side of a planned graphical drop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphicalDropPlan {
    pub element: ElementId,
    pub old_container: ElementId,
    pub new_container: ElementId,
}

impl GraphicalDropPlan {
    pub fn request(&self) -> DropRequest<'_> {
        DropRequest {
            element: &self.element,
            old_container: &self.old_container,
            new_container: &self.new_container,
        }
    }
}

/// Outcome of planning a graphical drop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropDecision {
    /// The node already sits under the target.
    NoOp,
    /// The drop cannot be displayed; see the diagnostics.
    Rejected,
    /// Views were requested; the model change is still to be applied.
    Planned(GraphicalDropPlan),
}

/// Check a graphical drop of `node` onto `target` and request its views.
///
/// Hard rejections (dropping a view into itself, a failed check) are
/// returned as errors before any request is made.
pub fn plan_graphical_drop(
    ctx: &mut DiagramContext<'_>,
    model: &dyn SemanticModel,
    checker: &dyn DropChecker,
    node: &NodeId,
    target: &ViewParent,
    diagnostics: &mut Diagnostics,
) -> Result<DropDecision, SyncError> {
    let diagram = ctx.diagram();
    let dropped = diagram
        .node(node)
        .ok_or_else(|| SyncError::UnknownNode(node.clone()))?;
    if let ViewParent::Node(target_id) = target {
        if diagram.node(target_id).is_none() {
            return Err(SyncError::UnknownNode(target_id.clone()));
        }
        if diagram.contains_in_subtree(node, target_id) {
            return Err(SyncError::invalid_drop("A view cannot be dropped into itself"));
        }
    }
    let description = ctx.description();
    let suffix = &ctx.options().compartment_suffix;
    if description
        .node_mapping(&dropped.mapping_id)
        .is_some_and(|m| m.is_compartment(suffix))
    {
        return Err(SyncError::invalid_drop("Compartments cannot be moved"));
    }
    if &dropped.parent == target {
        diagnostics.info(codes::NO_OP, format!("{node} is already there"));
        return Ok(DropDecision::NoOp);
    }

    let element = model
        .resolve(&dropped.target_id)
        .ok_or_else(|| SyncError::UnknownElement(dropped.target_id.clone()))?;
    let variant = if element.is_metaclass {
        MappingVariant::Metaclass
    } else {
        MappingVariant::Default
    };
    let placement = resolve_placement(ctx, element.kind, variant, target, diagnostics);
    if placement
        .as_ref()
        .is_some_and(|p| is_current_position(ctx, p, dropped))
    {
        diagnostics.info(codes::NO_OP, format!("{node} is already there"));
        return Ok(DropDecision::NoOp);
    }

    // CHECK
    let plan = GraphicalDropPlan {
        element: element.id.clone(),
        old_container: diagram
            .target_of(&dropped.parent)
            .cloned()
            .ok_or_else(|| SyncError::UnknownNode(node.clone()))?,
        new_container: diagram
            .target_of(target)
            .cloned()
            .ok_or_else(|| SyncError::UnknownNode(node.clone()))?,
    };
    checker.check(model, &plan.request())?;

    // CREATE_VIEWS (requested only)
    let Some(placement) = placement else {
        diagnostics.warn(
            codes::UNREPRESENTABLE_ELEMENT,
            format!("{} cannot be displayed here", element.label()),
        );
        return Ok(DropDecision::Rejected);
    };
    let Placed::Created(parent) = apply_placement(ctx, &placement, &element.id) else {
        diagnostics.warn(
            codes::DUPLICATE_VIEW,
            format!("{} is already displayed here", element.label()),
        );
        return Ok(DropDecision::Rejected);
    };
    let placeholder = ctx.create_placeholder_node(&element.id, &parent, &placement.mapping);
    clone_children(
        ctx,
        model,
        dropped,
        &placeholder.id,
        &placeholder.mapping_id,
        diagnostics,
    );

    // DELETE_OLD_VIEW (requested only)
    ctx.delete_view(node);
    tracing::debug!(%node, to = %target, "graphical drop planned");
    Ok(DropDecision::Planned(plan))
}

/// Whether `placement` resolves to the position `node` already occupies,
/// such as a drop on the node owning the compartment it sits in.
fn is_current_position(ctx: &DiagramContext<'_>, placement: &Placement, node: &Node) -> bool {
    if placement.mapping != node.mapping_id {
        return false;
    }
    let parent = match &placement.compartment {
        None => placement.parent.clone(),
        Some(compartment) => {
            let Some(owner) = ctx.target_of(&placement.parent) else {
                return false;
            };
            match ctx.diagram().find_node(compartment, &owner, &placement.parent) {
                Some(existing) => ViewParent::Node(existing.id.clone()),
                None => return false,
            }
        }
    };
    parent == node.parent
}

/// Request copies of every view below `old` under the new node `new_id`.
///
/// Children keep their mapping when it is declared under the new node's
/// mapping; compartments are matched by category; anything else goes
/// through placement again.
fn clone_children(
    ctx: &mut DiagramContext<'_>,
    model: &dyn SemanticModel,
    old: &Node,
    new_id: &NodeId,
    new_mapping: &MappingId,
    diagnostics: &mut Diagnostics,
) {
    let diagram = ctx.diagram();
    let description = ctx.description();
    let suffix = &ctx.options().compartment_suffix;
    let new_parent = ViewParent::Node(new_id.clone());
    let Some(new_target) = ctx.target_of(&new_parent) else {
        return;
    };

    for child in old.all_children().filter_map(|id| diagram.node(id)) {
        let Some(child_mapping) = description.node_mapping(&child.mapping_id) else {
            continue;
        };

        if child_mapping.synchronized && child_mapping.is_compartment(suffix) {
            let category = child_mapping.compartment_category(suffix);
            let counterpart = description
                .compartments_of(new_mapping, suffix)
                .into_iter()
                .find(|m| m.compartment_category(suffix) == category);
            match counterpart {
                Some(compartment) => {
                    let placeholder =
                        ctx.create_placeholder_node(&new_target, &new_parent, &compartment.id);
                    ctx.create_view(&new_target, &new_parent, &compartment.id);
                    clone_children(ctx, model, child, &placeholder.id, &compartment.id, diagnostics);
                }
                None => clone_children(ctx, model, child, new_id, new_mapping, diagnostics),
            }
            continue;
        }

        let Some(element) = model.resolve(&child.target_id) else {
            continue;
        };
        let (parent, mapping) = if description.is_declared_under(&child.mapping_id, Some(new_mapping)) {
            ctx.create_view(&child.target_id, &new_parent, &child.mapping_id);
            (new_parent.clone(), child.mapping_id.clone())
        } else {
            let variant = if element.is_metaclass {
                MappingVariant::Metaclass
            } else {
                MappingVariant::Default
            };
            let placement = resolve_placement(ctx, element.kind, variant, &new_parent, diagnostics);
            match placement.map(|p| (apply_placement(ctx, &p, &child.target_id), p.mapping)) {
                Some((Placed::Created(parent), mapping)) => (parent, mapping),
                Some((Placed::AlreadyDisplayed, _)) => continue,
                None => {
                    diagnostics.warn(
                        codes::UNREPRESENTABLE_ELEMENT,
                        format!("{} cannot be displayed in its new container", element.label()),
                    );
                    continue;
                }
            }
        };
        let placeholder = ctx.create_placeholder_node(&child.target_id, &parent, &mapping);
        clone_children(ctx, model, child, &placeholder.id, &mapping, diagnostics);
    }
}
