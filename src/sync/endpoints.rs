//! Semantic endpoints of domain-based edges.
//!
//! Each relationship metaclass stores its ends differently: in its owner,
//! in reference features, behind member-end properties, connector ends or
//! message occurrences. The resolver hides those differences behind
//! [`EdgeEndpointResolver::source`] and [`EdgeEndpointResolver::targets`].

use crate::base::ElementId;
use crate::semantic::{Element, ElementKind, SemanticModel};

use ElementKind as K;

/// How a metaclass stores one end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointFeature {
    /// The owner of the relationship.
    Owner,
    /// A reference feature of the relationship.
    Reference(&'static str),
    /// The `type` of the n-th `memberEnd` property.
    MemberEndType(usize),
    /// The `role` of the n-th owned `end`.
    ConnectorEndRole(usize),
    /// The `covered` lifeline of the occurrence in a reference feature.
    CoveredBy(&'static str),
}

/// Where the source and target of a metaclass are stored.
pub fn endpoint_features(kind: ElementKind) -> Option<(EndpointFeature, EndpointFeature)> {
    use EndpointFeature as F;
    let features = match kind {
        K::Generalization => (F::Owner, F::Reference("general")),
        K::Include => (F::Owner, F::Reference("addition")),
        K::Extend => (F::Owner, F::Reference("extendedCase")),
        K::PackageImport => (F::Owner, F::Reference("importedPackage")),
        K::PackageMerge => (F::Owner, F::Reference("mergedPackage")),
        K::ElementImport => (F::Owner, F::Reference("importedElement")),
        K::Association | K::Extension => (F::MemberEndType(0), F::MemberEndType(1)),
        K::Connector => (F::ConnectorEndRole(0), F::ConnectorEndRole(1)),
        K::Message => (F::CoveredBy("sendEvent"), F::CoveredBy("receiveEvent")),
        K::Transition => (F::Reference("source"), F::Reference("target")),
        k if k.is_a(K::ActivityEdge) => (F::Reference("source"), F::Reference("target")),
        k if k.is_a(K::Dependency) => (F::Reference("client"), F::Reference("supplier")),
        _ => return None,
    };
    Some(features)
}

/// Resolves the semantic ends of relationships.
#[derive(Clone, Copy)]
pub struct EdgeEndpointResolver<'m> {
    model: &'m dyn SemanticModel,
}

impl<'m> EdgeEndpointResolver<'m> {
    pub fn new(model: &'m dyn SemanticModel) -> Self {
        Self { model }
    }

    /// The semantic source of `edge`.
    pub fn source(&self, edge: &Element) -> Option<ElementId> {
        let (source, _) = endpoint_features(edge.kind)?;
        self.resolve(edge, source).into_iter().next()
    }

    /// The semantic targets of `edge`.
    pub fn targets(&self, edge: &Element) -> Vec<ElementId> {
        match endpoint_features(edge.kind) {
            Some((_, target)) => self.resolve(edge, target),
            None => Vec::new(),
        }
    }

    /// Source followed by targets, without duplicates.
    pub fn endpoints(&self, edge: &Element) -> Vec<ElementId> {
        let mut result: Vec<ElementId> = self.source(edge).into_iter().collect();
        for target in self.targets(edge) {
            if !result.contains(&target) {
                result.push(target);
            }
        }
        result
    }

    fn resolve(&self, edge: &Element, feature: EndpointFeature) -> Vec<ElementId> {
        match feature {
            EndpointFeature::Owner => edge.owner.iter().cloned().collect(),
            EndpointFeature::Reference(name) => edge.referenced(name).to_vec(),
            EndpointFeature::MemberEndType(index) => edge
                .referenced("memberEnd")
                .get(index)
                .and_then(|end| self.model.resolve(end))
                .and_then(|end| end.first_referenced("type"))
                .cloned()
                .into_iter()
                .collect(),
            EndpointFeature::ConnectorEndRole(index) => edge
                .owned("end")
                .get(index)
                .and_then(|end| self.model.resolve(end))
                .and_then(|end| end.first_referenced("role"))
                .cloned()
                .into_iter()
                .collect(),
            EndpointFeature::CoveredBy(event) => edge
                .first_referenced(event)
                .and_then(|occurrence| self.model.resolve(occurrence))
                .and_then(|occurrence| occurrence.first_referenced("covered"))
                .cloned()
                .into_iter()
                .collect(),
        }
    }
}
