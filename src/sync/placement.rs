//! Where to put a new node.
//!
//! Placement is resolved in tiers against a target view:
//!
//! 1. a mapping declared directly under the target's mapping;
//! 2. a mapping declared under one of the target's compartments (the
//!    compartment is requested too when it is not displayed yet);
//! 3. when the target is itself a compartment, the compartments of its
//!    parent node.
//!
//! Resolution does not depend on the element ID, so a placement can be
//! checked before the element it is for exists.

use crate::base::{ElementId, MappingId};
use crate::description::MappingVariant;
use crate::diagnostics::Diagnostics;
use crate::diagram::ViewParent;
use crate::semantic::ElementKind;

use super::context::DiagramContext;
use super::mapper::NodeMapper;

/// A resolved position for a new node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// View receiving the node, or the compartment's parent.
    pub parent: ViewParent,
    /// Compartment of `parent` receiving the node.
    pub compartment: Option<MappingId>,
    pub mapping: MappingId,
}

/// Result of applying a placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Placed {
    /// A new node was requested under the given parent.
    Created(ViewParent),
    /// The element is already displayed at that position.
    AlreadyDisplayed,
}

/// Resolve where a `kind` element can be displayed when dropped on `target`.
pub fn resolve_placement(
    ctx: &DiagramContext<'_>,
    kind: ElementKind,
    variant: MappingVariant,
    target: &ViewParent,
    diagnostics: &mut Diagnostics,
) -> Option<Placement> {
    let mapper = NodeMapper::new(ctx.description());

    // Tier 1: directly under the target.
    let target_mapping = ctx.mapping_of(target);
    if target.node_id().is_some() && target_mapping.is_none() {
        return None;
    }
    if let Some(resolved) =
        mapper.resolve(target_mapping.map(|m| &m.id), kind, variant, diagnostics)
    {
        return Some(Placement {
            parent: target.clone(),
            compartment: None,
            mapping: resolved.mapping.id.clone(),
        });
    }
    let target_mapping = target_mapping?;

    // Tier 2: a compartment of the target.
    if let Some(placement) = in_compartments(ctx, &mapper, target, &target_mapping.id, kind, variant, diagnostics) {
        tracing::debug!(%target, mapping = %placement.mapping, "placed in compartment");
        return Some(placement);
    }

    // Tier 3: the target is a compartment, try its siblings.
    let suffix = &ctx.options().compartment_suffix;
    if target_mapping.is_compartment(suffix) {
        let target_id = target.node_id()?;
        let parent = ctx.view(target_id)?.parent().clone();
        let parent_mapping = ctx.mapping_of(&parent)?;
        let placement =
            in_compartments(ctx, &mapper, &parent, &parent_mapping.id, kind, variant, diagnostics)?;
        tracing::debug!(%target, mapping = %placement.mapping, "placed in sibling compartment");
        return Some(placement);
    }
    None
}

fn in_compartments(
    ctx: &DiagramContext<'_>,
    mapper: &NodeMapper<'_>,
    parent: &ViewParent,
    parent_mapping: &MappingId,
    kind: ElementKind,
    variant: MappingVariant,
    diagnostics: &mut Diagnostics,
) -> Option<Placement> {
    let suffix = &ctx.options().compartment_suffix;
    ctx.description()
        .compartments_of(parent_mapping, suffix)
        .into_iter()
        .find_map(|compartment| {
            let resolved = mapper.resolve(Some(&compartment.id), kind, variant, diagnostics)?;
            Some(Placement {
                parent: parent.clone(),
                compartment: Some(compartment.id.clone()),
                mapping: resolved.mapping.id.clone(),
            })
        })
}

/// Request the node for `element` at `placement`.
pub fn apply_placement(
    ctx: &mut DiagramContext<'_>,
    placement: &Placement,
    element: &ElementId,
) -> Placed {
    let parent = match &placement.compartment {
        None => placement.parent.clone(),
        Some(compartment) => {
            let Some(owner) = ctx.target_of(&placement.parent) else {
                return Placed::AlreadyDisplayed;
            };
            let node = ctx.create_placeholder_node(&owner, &placement.parent, compartment);
            ctx.create_view(&owner, &placement.parent, compartment);
            ViewParent::Node(node.id)
        }
    };
    if ctx.create_view(element, &parent, &placement.mapping) {
        Placed::Created(parent)
    } else {
        Placed::AlreadyDisplayed
    }
}
