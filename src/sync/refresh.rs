//! The refresh pass: apply view requests and resynchronize with the model.
//!
//! 1. Pending creations, in request order. Every new node gets the
//!    synchronized children (compartments) its mapping declares.
//! 2. Pending deletions.
//! 3. Orphan pruning: views whose element no longer exists.
//! 4. Labels.
//! 5. Domain-based edges, recomputed from the model for every displayed
//!    pair of endpoints. A pair gets one edge per element; when several
//!    edge mappings accept it, the first declared one is used.

use rustc_hash::FxHashMap;

use crate::base::{ElementId, MappingId, NodeId};
use crate::description::{DiagramDescription, NodeContainment};
use crate::diagnostics::{Diagnostics, codes};
use crate::diagram::{Diagram, Edge, Node, ViewParent, identity};
use crate::options::SyncOptions;
use crate::semantic::SemanticModel;

use super::context::PendingNode;
use super::endpoints::EdgeEndpointResolver;

/// Applies requests and synchronizes a snapshot.
#[derive(Clone, Copy)]
pub struct Refresher<'a> {
    model: &'a dyn SemanticModel,
    description: &'a DiagramDescription,
    options: &'a SyncOptions,
}

impl<'a> Refresher<'a> {
    pub fn new(
        model: &'a dyn SemanticModel,
        description: &'a DiagramDescription,
        options: &'a SyncOptions,
    ) -> Self {
        Self {
            model,
            description,
            options,
        }
    }

    /// Produce the next snapshot from `diagram` and the given requests.
    pub fn refresh(
        &self,
        diagram: &Diagram,
        creations: Vec<PendingNode>,
        deletions: Vec<NodeId>,
        diagnostics: &mut Diagnostics,
    ) -> Diagram {
        let mut next = diagram.clone();

        for pending in creations {
            let label = self.label_for(&pending.mapping_id, &pending.target_id);
            match next.insert_node(
                pending.parent,
                pending.mapping_id.clone(),
                pending.containment,
                pending.target_id.clone(),
                label,
            ) {
                Some(id) => self.create_synchronized(&mut next, &id, &pending.mapping_id, &pending.target_id),
                None => tracing::trace!(node = %pending.id, "pending node already applied"),
            }
        }

        for id in &deletions {
            let removed = next.remove_subtree(id);
            tracing::debug!(node = %id, count = removed.len(), "views deleted");
        }

        if self.options.prune_orphan_views {
            let orphans: Vec<NodeId> = next
                .nodes()
                .filter(|n| self.model.resolve(&n.target_id).is_none())
                .map(|n| n.id.clone())
                .collect();
            for id in orphans {
                if next.node(&id).is_some() {
                    tracing::debug!(node = %id, "pruning orphan view");
                    next.remove_subtree(&id);
                }
            }
        }

        if self.options.synchronize_labels {
            let labels: Vec<(NodeId, String)> = next
                .nodes()
                .map(|n| (n.id.clone(), self.label_for(&n.mapping_id, &n.target_id)))
                .collect();
            for (id, label) in labels {
                next.set_node_label(&id, label);
            }
        }

        let edges = self.compute_edges(&next, diagram, diagnostics);
        next.replace_edges(edges);
        tracing::debug!(
            nodes = next.node_count(),
            edges = next.edge_count(),
            "diagram refreshed"
        );
        next
    }

    /// Create the synchronized child nodes declared by `mapping`.
    fn create_synchronized(
        &self,
        diagram: &mut Diagram,
        node: &NodeId,
        mapping: &MappingId,
        target: &ElementId,
    ) {
        let synchronized: Vec<(MappingId, NodeContainment)> = self
            .description
            .mappings_declared_under(Some(mapping))
            .into_iter()
            .filter(|d| d.mapping.synchronized)
            .map(|d| (d.mapping.id.clone(), d.containment))
            .collect();
        for (child_mapping, containment) in synchronized {
            let label = self.label_for(&child_mapping, target);
            if let Some(child) = diagram.insert_node(
                ViewParent::Node(node.clone()),
                child_mapping.clone(),
                containment,
                target.clone(),
                label,
            ) {
                self.create_synchronized(diagram, &child, &child_mapping, target);
            }
        }
    }

    /// Compartments show their category, other nodes their element.
    fn label_for(&self, mapping: &MappingId, target: &ElementId) -> String {
        let suffix = &self.options.compartment_suffix;
        if let Some(category) = self
            .description
            .node_mapping(mapping)
            .and_then(|m| m.compartment_category(suffix))
        {
            return category.to_string();
        }
        self.model
            .resolve(target)
            .map(|e| e.label())
            .unwrap_or_default()
    }

    fn is_compartment(&self, mapping: &MappingId) -> bool {
        self.description
            .node_mapping(mapping)
            .is_some_and(|m| m.is_compartment(&self.options.compartment_suffix))
    }

    /// Every domain-based edge implied by the model and the displayed nodes.
    fn compute_edges(
        &self,
        diagram: &Diagram,
        previous: &Diagram,
        diagnostics: &mut Diagnostics,
    ) -> Vec<Edge> {
        let mut by_target: FxHashMap<&ElementId, Vec<&Node>> = FxHashMap::default();
        for node in diagram.iter_dfs() {
            if !self.is_compartment(&node.mapping_id) {
                by_target.entry(&node.target_id).or_default().push(node);
            }
        }

        let resolver = EdgeEndpointResolver::new(self.model);
        let mut edges = Vec::new();
        for element in self.model.elements() {
            if element.kind.edge_category().is_none() {
                continue;
            }
            let mappings = self.description.edge_mappings_for(element.kind);
            if mappings.is_empty() {
                continue;
            }
            let Some(source) = resolver.source(element) else {
                continue;
            };
            let targets = resolver.targets(element);
            let sources = by_target.get(&source).map_or(&[][..], Vec::as_slice);

            for source_node in sources {
                for target in &targets {
                    let target_nodes = by_target.get(target).map_or(&[][..], Vec::as_slice);
                    for target_node in target_nodes {
                        let mut accepting = mappings.iter().filter(|m| {
                            m.accepts_source(&source_node.mapping_id)
                                && m.accepts_target(&target_node.mapping_id)
                        });
                        let Some(mapping) = accepting.next() else {
                            continue;
                        };
                        let others: Vec<&str> = accepting.map(|m| m.id.as_str()).collect();
                        if !others.is_empty() {
                            diagnostics.info(
                                codes::AMBIGUOUS_MAPPING,
                                format!(
                                    "{} is displayed with {}; {} also match",
                                    element.label(),
                                    mapping.id,
                                    others.join(", ")
                                ),
                            );
                        }
                        let id = identity::edge_id(
                            &mapping.id,
                            &element.id,
                            &source_node.id,
                            &target_node.id,
                        );
                        let label = match previous.edge(&id) {
                            Some(existing) if !self.options.synchronize_labels => {
                                existing.label.clone()
                            }
                            _ => element.name.as_deref().unwrap_or_default().to_string(),
                        };
                        edges.push(Edge {
                            id,
                            mapping_id: mapping.id.clone(),
                            target_id: element.id.clone(),
                            source: source_node.id.clone(),
                            target: target_node.id.clone(),
                            label,
                        });
                    }
                }
            }
        }
        edges
    }
}
