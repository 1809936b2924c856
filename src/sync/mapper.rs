//! Node mapping resolution.
//!
//! Picks the most specific mapping able to display an element kind under a
//! given parent mapping.

use crate::base::MappingId;
use crate::description::{DiagramDescription, MappingVariant, NodeContainment, NodeMapping};
use crate::diagnostics::{Diagnostics, codes};
use crate::semantic::ElementKind;

/// A mapping chosen for a creation.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedMapping<'a> {
    pub mapping: &'a NodeMapping,
    pub containment: NodeContainment,
}

/// Resolves the node mapping to use for an element kind.
#[derive(Clone, Copy, Debug)]
pub struct NodeMapper<'a> {
    description: &'a DiagramDescription,
}

impl<'a> NodeMapper<'a> {
    pub fn new(description: &'a DiagramDescription) -> Self {
        Self { description }
    }

    /// The best mapping for `kind` among those declared under `parent`
    /// (the top level for `None`).
    ///
    /// Candidates are filtered to creation targets of the requested
    /// `variant` whose domain type is `kind` or one of its supertypes, then
    /// ranked by generalization distance. Ties go to the first declared
    /// candidate and are reported as [`codes::AMBIGUOUS_MAPPING`].
    pub fn resolve(
        &self,
        parent: Option<&MappingId>,
        kind: ElementKind,
        variant: MappingVariant,
        diagnostics: &mut Diagnostics,
    ) -> Option<ResolvedMapping<'a>> {
        let mut best: Option<(usize, ResolvedMapping<'a>)> = None;
        let mut tied = Vec::new();

        for declared in self.description.mappings_declared_under(parent) {
            let mapping = declared.mapping;
            if !mapping.is_creation_target() || mapping.variant != variant {
                continue;
            }
            let Some(distance) = kind.distance_to(mapping.domain_type) else {
                continue;
            };
            tracing::trace!(mapping = %mapping.id, distance, "mapping candidate");
            let candidate = ResolvedMapping {
                mapping,
                containment: declared.containment,
            };
            match best.as_ref().map(|(d, _)| *d) {
                Some(d) if distance > d => {}
                Some(d) if distance == d => tied.push(mapping.id.clone()),
                _ => {
                    best = Some((distance, candidate));
                    tied.clear();
                }
            }
        }

        let (_, resolved) = best?;
        if !tied.is_empty() {
            diagnostics.info(
                codes::AMBIGUOUS_MAPPING,
                format!(
                    "{} mappings can display {kind}; using '{}' (also: {})",
                    tied.len() + 1,
                    resolved.mapping.id,
                    tied.iter()
                        .map(MappingId::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            );
        }
        Some(resolved)
    }
}
