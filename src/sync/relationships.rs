//! Creating and reconnecting relationships in the semantic model.
//!
//! Where a relationship lives depends on its category: owner-sourced
//! relationships sit in their source, dependencies and associations in the
//! nearest package, and so on. Reconnecting an owner-sourced end moves the
//! relationship; every other end is a reference replacement.

use crate::base::ElementId;
use crate::diagnostics::{Diagnostics, codes};
use crate::error::SyncError;
use crate::semantic::kind::default_containment_feature;
use crate::semantic::{ElementKind, SemanticModel};

use super::endpoints::{EndpointFeature, endpoint_features};
use ElementKind as K;

/// Which end of an edge is reconnected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointRole {
    Source,
    Target,
}

impl std::fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Source => "source",
            Self::Target => "target",
        })
    }
}

/// The container (and its feature) receiving a new relationship.
fn relationship_container(
    model: &dyn SemanticModel,
    kind: ElementKind,
    source: &ElementId,
) -> Option<(ElementId, &'static str)> {
    let (source_feature, _) = endpoint_features(kind)?;
    let nearest = |container: ElementKind, feature: &'static str| {
        model
            .nearest_ancestor(source, container, true)
            .map(|e| (e.id.clone(), feature))
    };
    match source_feature {
        EndpointFeature::Owner => {
            let owner = model.resolve(source)?;
            let feature = default_containment_feature(owner.kind, kind)?;
            Some((owner.id.clone(), feature))
        }
        EndpointFeature::MemberEndType(_) => nearest(K::Package, "packagedElement"),
        EndpointFeature::ConnectorEndRole(_) => model
            .owner_of(source)
            .and_then(|owner| model.nearest_ancestor(&owner.id, K::StructuredClassifier, true))
            .map(|e| (e.id.clone(), "ownedConnector")),
        EndpointFeature::CoveredBy(_) => nearest(K::Interaction, "message"),
        EndpointFeature::Reference(_) if kind.is_a(K::ActivityEdge) => nearest(K::Activity, "edge"),
        EndpointFeature::Reference(_) if kind == K::Transition => nearest(K::Region, "transition"),
        EndpointFeature::Reference(_) => nearest(K::Package, "packagedElement"),
    }
}

/// Create a relationship of `kind` from `source` to `target`.
///
/// Returns `Ok(None)` with a warning when no container can hold the
/// relationship; nothing is created in that case.
pub fn create_relationship(
    model: &mut dyn SemanticModel,
    kind: ElementKind,
    source: &ElementId,
    target: &ElementId,
    diagnostics: &mut Diagnostics,
) -> Result<Option<ElementId>, SyncError> {
    for id in [source, target] {
        if model.resolve(id).is_none() {
            return Err(SyncError::UnknownElement(id.clone()));
        }
    }
    let Some((container, feature)) = relationship_container(model, kind, source) else {
        diagnostics.warn(
            codes::UNREPRESENTABLE_ELEMENT,
            format!("No element can contain a new {kind} from {source}"),
        );
        return Ok(None);
    };
    if !model.is_editable(&container) {
        return Err(SyncError::NotEditable(container));
    }
    let Some((source_feature, target_feature)) = endpoint_features(kind) else {
        return Ok(None);
    };

    let relationship = model.create_element(kind, &container, feature)?;
    tracing::debug!(%relationship, %kind, %container, feature, "relationship created");
    set_end(model, &relationship, source_feature, source, &container)?;
    set_end(model, &relationship, target_feature, target, &container)?;
    Ok(Some(relationship))
}

fn set_end(
    model: &mut dyn SemanticModel,
    relationship: &ElementId,
    feature: EndpointFeature,
    end: &ElementId,
    container: &ElementId,
) -> Result<(), SyncError> {
    match feature {
        EndpointFeature::Owner => Ok(()),
        EndpointFeature::Reference(name) => model.set_references(relationship, name, vec![end.clone()]),
        EndpointFeature::MemberEndType(_) => {
            let property = model.create_element(K::Property, relationship, "ownedEnd")?;
            model.set_references(&property, "type", vec![end.clone()])?;
            model.add_to_feature(relationship, "memberEnd", &property)
        }
        EndpointFeature::ConnectorEndRole(_) => {
            let connector_end = model.create_element(K::ConnectorEnd, relationship, "end")?;
            model.set_references(&connector_end, "role", vec![end.clone()])
        }
        EndpointFeature::CoveredBy(event) => {
            let occurrence =
                model.create_element(K::MessageOccurrenceSpecification, container, "fragment")?;
            model.set_references(&occurrence, "covered", vec![end.clone()])?;
            model.set_references(relationship, event, vec![occurrence])
        }
    }
}

/// Check that a reconnection can be applied, without mutating anything.
pub fn check_reconnection(
    model: &dyn SemanticModel,
    relationship: &ElementId,
    role: EndpointRole,
    new_end: &ElementId,
) -> Result<(), SyncError> {
    let element = model
        .resolve(relationship)
        .ok_or_else(|| SyncError::UnknownElement(relationship.clone()))?;
    let new = model
        .resolve(new_end)
        .ok_or_else(|| SyncError::UnknownElement(new_end.clone()))?;
    let (source, target) = endpoint_features(element.kind).ok_or_else(|| {
        SyncError::invalid_reconnection(format!("{} cannot be reconnected", element.kind))
    })?;
    let feature = match role {
        EndpointRole::Source => source,
        EndpointRole::Target => target,
    };
    if !model.is_editable(relationship) {
        return Err(SyncError::NotEditable(relationship.clone()));
    }
    if feature == EndpointFeature::Owner {
        if default_containment_feature(new.kind, element.kind).is_none() {
            return Err(SyncError::invalid_reconnection(format!(
                "{} cannot own a {}",
                new.label(),
                element.kind
            )));
        }
        if !model.is_editable(new_end) {
            return Err(SyncError::NotEditable(new_end.clone()));
        }
    }
    Ok(())
}

/// Point the `role` end of `relationship` at `new_end`.
pub fn reconnect_relationship(
    model: &mut dyn SemanticModel,
    relationship: &ElementId,
    role: EndpointRole,
    new_end: &ElementId,
) -> Result<(), SyncError> {
    check_reconnection(model, relationship, role, new_end)?;
    let (kind, feature, owned_ends, member_ends, events) = {
        let element = model
            .resolve(relationship)
            .ok_or_else(|| SyncError::UnknownElement(relationship.clone()))?;
        let (source, target) = endpoint_features(element.kind)
            .ok_or_else(|| SyncError::invalid_reconnection("not a relationship"))?;
        let feature = match role {
            EndpointRole::Source => source,
            EndpointRole::Target => target,
        };
        let events = |name: &str| element.first_referenced(name).cloned();
        (
            element.kind,
            feature,
            element.owned("end").to_vec(),
            element.referenced("memberEnd").to_vec(),
            (events("sendEvent"), events("receiveEvent")),
        )
    };

    match feature {
        EndpointFeature::Owner => {
            let new_kind = model
                .resolve(new_end)
                .map(|e| e.kind)
                .ok_or_else(|| SyncError::UnknownElement(new_end.clone()))?;
            let feature = default_containment_feature(new_kind, kind).ok_or_else(|| {
                SyncError::invalid_reconnection(format!("{new_end} cannot own a {kind}"))
            })?;
            model.add_to_feature(new_end, feature, relationship)
        }
        EndpointFeature::Reference(name) => {
            model.set_references(relationship, name, vec![new_end.clone()])
        }
        EndpointFeature::MemberEndType(index) => {
            let end = member_ends.get(index).ok_or_else(|| {
                SyncError::invalid_reconnection(format!("{kind} has no member end {index}"))
            })?;
            model.set_references(end, "type", vec![new_end.clone()])
        }
        EndpointFeature::ConnectorEndRole(index) => {
            let end = owned_ends.get(index).ok_or_else(|| {
                SyncError::invalid_reconnection(format!("{kind} has no end {index}"))
            })?;
            model.set_references(end, "role", vec![new_end.clone()])
        }
        EndpointFeature::CoveredBy(event) => {
            let occurrence = match event {
                "sendEvent" => events.0,
                _ => events.1,
            }
            .ok_or_else(|| SyncError::invalid_reconnection(format!("{kind} has no {event}")))?;
            model.set_references(&occurrence, "covered", vec![new_end.clone()])
        }
    }
}
