//! The entry points of every user gesture on a diagram.
//!
//! Each operation takes the current snapshot and returns an [`EditOutcome`]
//! holding the next one. Operations run in two phases:
//!
//! ```text
//! gesture ──► DiagramContext (view requests, checks) ──► model mutation
//!                                                           │
//!                      next snapshot ◄── Refresher ◄────────┘
//! ```
//!
//! Every check runs before the first model mutation, and the snapshot
//! passed in is never modified. A hard error (`Err`) or a `Failed` outcome
//! therefore leaves both the model and the caller's snapshot as they were.

use crate::base::{EdgeId, ElementId, NodeId, ToolId};
use crate::description::{DiagramDescription, EdgeTool, MappingVariant};
use crate::diagnostics::{Diagnostics, Reported, codes};
use crate::diagram::{Diagram, ViewParent, ViewRef};
use crate::error::SyncError;
use crate::options::SyncOptions;
use crate::semantic::kind::default_containment_feature;
use crate::semantic::{ChangeTracker, SemanticModel};

use super::connector::ConnectorToolResolver;
use super::context::{DiagramContext, PendingNode};
use super::drop::{self, DropBehaviorRegistry, DropDecision};
use super::placement::{apply_placement, resolve_placement};
use super::refresh::Refresher;
use super::relationships::{EndpointRole, create_relationship, reconnect_relationship};

// ============================================================================
// OUTCOME
// ============================================================================

/// How an operation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditStatus {
    /// The model or the diagram changed.
    Applied,
    /// Nothing needed to change.
    Unchanged,
    /// The gesture could not be performed; see the diagnostics.
    Failed,
}

/// Result of one operation.
#[derive(Clone, Debug)]
pub struct EditOutcome {
    pub status: EditStatus,
    /// The next snapshot (an unchanged copy when nothing was applied).
    pub diagram: Diagram,
    pub diagnostics: Diagnostics,
    /// Semantic elements created, modified or removed by the operation.
    pub changes: ChangeTracker,
}

impl EditOutcome {
    fn unchanged(diagram: &Diagram, diagnostics: Diagnostics) -> Self {
        Self {
            status: EditStatus::Unchanged,
            diagram: diagram.clone(),
            diagnostics,
            changes: ChangeTracker::new(),
        }
    }

    fn failed(diagram: &Diagram, diagnostics: Diagnostics) -> Self {
        Self {
            status: EditStatus::Failed,
            diagram: diagram.clone(),
            diagnostics,
            changes: ChangeTracker::new(),
        }
    }

    pub fn is_applied(&self) -> bool {
        self.status == EditStatus::Applied
    }

    pub fn is_failed(&self) -> bool {
        self.status == EditStatus::Failed
    }
}

// ============================================================================
// COORDINATOR
// ============================================================================

/// Orchestrates view operations, drop reconciliation and refresh for one
/// diagram type.
#[derive(Debug)]
pub struct DiagramSyncCoordinator<'d> {
    description: &'d DiagramDescription,
    options: SyncOptions,
    behaviors: DropBehaviorRegistry,
}

impl<'d> DiagramSyncCoordinator<'d> {
    pub fn new(description: &'d DiagramDescription) -> Self {
        Self {
            description,
            options: SyncOptions::default(),
            behaviors: DropBehaviorRegistry::new(),
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Use custom drop checkers and providers.
    pub fn with_behaviors(mut self, behaviors: DropBehaviorRegistry) -> Self {
        self.behaviors = behaviors;
        self
    }

    pub fn description(&self) -> &'d DiagramDescription {
        self.description
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    // ── Diagram lifecycle ───────────────────────────────────────────

    /// An empty diagram opened on `root`.
    pub fn create_diagram(
        &self,
        model: &dyn SemanticModel,
        root: &ElementId,
    ) -> Result<Diagram, SyncError> {
        let element = model
            .resolve(root)
            .ok_or_else(|| SyncError::UnknownElement(root.clone()))?;
        if !element.kind.is_a(self.description.domain_type) {
            return Err(SyncError::Description(format!(
                "{} diagrams cannot be opened on {}",
                self.description.name, element.kind
            )));
        }
        tracing::debug!(description = %self.description.id, %root, "diagram created");
        let diagram = Diagram::new(self.description.id.clone(), root.clone());
        let mut diagnostics = Diagnostics::new();
        Ok(self
            .refresher(model)
            .refresh(&diagram, Vec::new(), Vec::new(), &mut diagnostics))
    }

    /// Resynchronize `diagram` with the model.
    pub fn refresh(&self, model: &dyn SemanticModel, diagram: &Diagram) -> EditOutcome {
        let mut diagnostics = Diagnostics::new();
        let next = self
            .refresher(model)
            .refresh(diagram, Vec::new(), Vec::new(), &mut diagnostics);
        self.outcome(diagram, next, diagnostics, ChangeTracker::new())
    }

    // ── Creation ────────────────────────────────────────────────────

    /// Create a semantic element with a node tool under `parent` and
    /// display it.
    pub fn create_node(
        &self,
        model: &mut dyn SemanticModel,
        diagram: &Diagram,
        parent: &ViewParent,
        tool: &ToolId,
    ) -> Result<EditOutcome, SyncError> {
        let tool = self
            .description
            .node_tool(tool)
            .ok_or_else(|| SyncError::UnknownTool(tool.clone()))?;
        let mut diagnostics = Diagnostics::new();
        let mut ctx = DiagramContext::new(diagram, self.description, &self.options);
        if let ViewParent::Node(id) = parent {
            if diagram.node(id).is_none() {
                return Err(SyncError::UnknownNode(id.clone()));
            }
        }
        let container = ctx
            .target_of(parent)
            .ok_or_else(|| SyncError::UnknownElement(diagram.target_id.clone()))?;

        let applicable = match ctx.mapping_of(parent) {
            None => tool.on_diagram,
            Some(mapping) => tool.targets.contains(&mapping.id),
        };
        if !applicable {
            diagnostics.warn(
                codes::TOOL_NOT_APPLICABLE,
                format!("{} cannot be used on {parent}", tool.name),
            );
            return Ok(EditOutcome::failed(diagram, diagnostics));
        }

        let container_kind = model
            .resolve(&container)
            .map(|e| e.kind)
            .ok_or_else(|| SyncError::UnknownElement(container.clone()))?;
        let feature = match &tool.feature {
            Some(feature) => feature.to_string(),
            None => match default_containment_feature(container_kind, tool.kind) {
                Some(feature) => feature.to_string(),
                None => {
                    diagnostics.warn(
                        codes::UNREPRESENTABLE_ELEMENT,
                        format!("{container_kind} cannot contain a {}", tool.kind),
                    );
                    return Ok(EditOutcome::failed(diagram, diagnostics));
                }
            },
        };
        let Some(placement) =
            resolve_placement(&ctx, tool.kind, MappingVariant::Default, parent, &mut diagnostics)
        else {
            diagnostics.warn(
                codes::UNREPRESENTABLE_ELEMENT,
                format!("A new {} cannot be displayed on {parent}", tool.kind),
            );
            return Ok(EditOutcome::failed(diagram, diagnostics));
        };

        let element = model.create_element(tool.kind, &container, &feature)?;
        tracing::debug!(%element, tool = %tool.id, "element created by tool");
        apply_placement(&mut ctx, &placement, &element);
        let (creations, deletions) = ctx.into_requests();
        Ok(self.finish(model, diagram, creations, deletions, diagnostics))
    }

    /// Create a relationship with an edge tool between the elements of two
    /// nodes. The edge appears through synchronization.
    pub fn create_edge(
        &self,
        model: &mut dyn SemanticModel,
        diagram: &Diagram,
        source: &NodeId,
        target: &NodeId,
        tool: &ToolId,
    ) -> Result<EditOutcome, SyncError> {
        let tool = self
            .description
            .edge_tool(tool)
            .ok_or_else(|| SyncError::UnknownTool(tool.clone()))?;
        let source = diagram
            .node(source)
            .ok_or_else(|| SyncError::UnknownNode(source.clone()))?;
        let target = diagram
            .node(target)
            .ok_or_else(|| SyncError::UnknownNode(target.clone()))?;

        let mut diagnostics = Diagnostics::new();
        let accepted = self
            .description
            .candidate_pairs(tool)
            .iter()
            .any(|pair| pair.accepts(&source.mapping_id, &target.mapping_id));
        if !accepted {
            diagnostics.warn(
                codes::TOOL_NOT_APPLICABLE,
                format!(
                    "{} cannot connect {} to {}",
                    tool.name, source.label, target.label
                ),
            );
            return Ok(EditOutcome::failed(diagram, diagnostics));
        }

        match create_relationship(model, tool.kind, &source.target_id, &target.target_id, &mut diagnostics)? {
            Some(relationship) => {
                tracing::debug!(%relationship, tool = %tool.id, "relationship created by tool");
                Ok(self.finish(model, diagram, Vec::new(), Vec::new(), diagnostics))
            }
            None => Ok(EditOutcome::failed(diagram, diagnostics)),
        }
    }

    // ── Drops ───────────────────────────────────────────────────────

    /// Display an existing element on `target`. The model is not changed.
    pub fn drop_semantic(
        &self,
        model: &dyn SemanticModel,
        diagram: &Diagram,
        element: &ElementId,
        target: &ViewParent,
    ) -> Result<EditOutcome, SyncError> {
        let mut diagnostics = Diagnostics::new();
        let mut ctx = DiagramContext::new(diagram, self.description, &self.options);
        if !drop::drop_semantic(&mut ctx, model, element, target, &mut diagnostics)? {
            if diagnostics.contains_code(codes::ALREADY_REPRESENTED)
                || diagnostics.contains_code(codes::DUPLICATE_VIEW)
            {
                return Ok(EditOutcome::unchanged(diagram, diagnostics));
            }
            return Ok(EditOutcome::failed(diagram, diagnostics));
        }
        let (creations, deletions) = ctx.into_requests();
        let next = self
            .refresher(model)
            .refresh(diagram, creations, deletions, &mut diagnostics);
        Ok(self.outcome(diagram, next, diagnostics, ChangeTracker::new()))
    }

    /// Move `node` under `target`, moving its element to the new semantic
    /// container.
    pub fn drop_graphical(
        &self,
        model: &mut dyn SemanticModel,
        diagram: &Diagram,
        node: &NodeId,
        target: &ViewParent,
    ) -> Result<EditOutcome, SyncError> {
        let mut diagnostics = Diagnostics::new();
        let mut ctx = DiagramContext::new(diagram, self.description, &self.options);
        let checker = self.behaviors.checker(&self.description.id);
        let plan = match drop::plan_graphical_drop(&mut ctx, &*model, checker, node, target, &mut diagnostics)? {
            DropDecision::NoOp => return Ok(EditOutcome::unchanged(diagram, diagnostics)),
            DropDecision::Rejected => return Ok(EditOutcome::failed(diagram, diagnostics)),
            DropDecision::Planned(plan) => plan,
        };

        self.behaviors
            .provider(&self.description.id)
            .apply(model, &plan.request())?;
        let (creations, deletions) = ctx.into_requests();
        Ok(self.finish(model, diagram, creations, deletions, diagnostics))
    }

    // ── Reconnection ────────────────────────────────────────────────

    /// Point one end of `edge` at the element of `new_node`.
    pub fn reconnect(
        &self,
        model: &mut dyn SemanticModel,
        diagram: &Diagram,
        edge: &EdgeId,
        role: EndpointRole,
        new_node: &NodeId,
    ) -> Result<EditOutcome, SyncError> {
        let edge = diagram
            .edge(edge)
            .ok_or_else(|| SyncError::UnknownEdge(edge.clone()))?;
        let node = diagram
            .node(new_node)
            .ok_or_else(|| SyncError::UnknownNode(new_node.clone()))?;
        let mapping = self
            .description
            .edge_mapping(&edge.mapping_id)
            .ok_or_else(|| SyncError::UnknownMapping(edge.mapping_id.clone()))?;

        let (current, accepted) = match role {
            EndpointRole::Source => (&edge.source, mapping.accepts_source(&node.mapping_id)),
            EndpointRole::Target => (&edge.target, mapping.accepts_target(&node.mapping_id)),
        };
        if !accepted {
            return Err(SyncError::invalid_reconnection(format!(
                "{} cannot be the {role} of {}",
                node.label, mapping.name
            )));
        }
        let mut diagnostics = Diagnostics::new();
        if current == new_node {
            diagnostics.info(codes::NO_OP, format!("{role} of {} is unchanged", edge.id));
            return Ok(EditOutcome::unchanged(diagram, diagnostics));
        }

        reconnect_relationship(model, &edge.target_id, role, &node.target_id)?;
        tracing::debug!(edge = %edge.id, %role, node = %new_node, "edge reconnected");
        Ok(self.finish(model, diagram, Vec::new(), Vec::new(), diagnostics))
    }

    // ── Deletion ────────────────────────────────────────────────────

    /// Remove a node (and its subtree) from the diagram only.
    pub fn delete_view(
        &self,
        model: &dyn SemanticModel,
        diagram: &Diagram,
        node: &NodeId,
    ) -> Result<EditOutcome, SyncError> {
        if diagram.node(node).is_none() {
            return Err(SyncError::UnknownNode(node.clone()));
        }
        let mut ctx = DiagramContext::new(diagram, self.description, &self.options);
        ctx.delete_view(node);
        let (creations, deletions) = ctx.into_requests();
        let mut diagnostics = Diagnostics::new();
        let next = self
            .refresher(model)
            .refresh(diagram, creations, deletions, &mut diagnostics);
        Ok(self.outcome(diagram, next, diagnostics, ChangeTracker::new()))
    }

    /// Delete the element displayed by `view` from the model, with every
    /// view of it and of its content.
    pub fn delete_semantic(
        &self,
        model: &mut dyn SemanticModel,
        diagram: &Diagram,
        view: &ViewRef,
    ) -> Result<EditOutcome, SyncError> {
        let target = match view {
            ViewRef::Node(id) => diagram
                .node(id)
                .map(|n| n.target_id.clone())
                .ok_or_else(|| SyncError::UnknownNode(id.clone()))?,
            ViewRef::Edge(id) => diagram
                .edge(id)
                .map(|e| e.target_id.clone())
                .ok_or_else(|| SyncError::UnknownEdge(id.clone()))?,
        };
        if !model.is_editable(&target) {
            return Err(SyncError::NotEditable(target));
        }

        let deleted = model.delete_element(&target)?;
        let mut ctx = DiagramContext::new(diagram, self.description, &self.options);
        for id in &deleted {
            for node in diagram.nodes_displaying(id) {
                ctx.delete_view(&node.id);
            }
        }
        let (creations, deletions) = ctx.into_requests();
        Ok(self.finish(model, diagram, creations, deletions, Diagnostics::new()))
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Edge tools able to connect two displayed nodes.
    pub fn connector_tools(
        &self,
        model: &dyn SemanticModel,
        diagram: &Diagram,
        source: &NodeId,
        target: &NodeId,
    ) -> Result<Reported<Vec<&'d EdgeTool>>, SyncError> {
        ConnectorToolResolver::new(self.description).connector_tools(model, diagram, source, target)
    }

    // ── Internals ───────────────────────────────────────────────────

    fn refresher<'a>(&'a self, model: &'a dyn SemanticModel) -> Refresher<'a> {
        Refresher::new(model, self.description, &self.options)
    }

    /// Refresh after a model mutation and collect the recorded changes.
    fn finish(
        &self,
        model: &mut dyn SemanticModel,
        diagram: &Diagram,
        creations: Vec<PendingNode>,
        deletions: Vec<NodeId>,
        mut diagnostics: Diagnostics,
    ) -> EditOutcome {
        let changes = model.take_changes();
        let next = self
            .refresher(&*model)
            .refresh(diagram, creations, deletions, &mut diagnostics);
        self.outcome(diagram, next, diagnostics, changes)
    }

    fn outcome(
        &self,
        previous: &Diagram,
        next: Diagram,
        diagnostics: Diagnostics,
        changes: ChangeTracker,
    ) -> EditOutcome {
        let status = if &next == previous && !changes.has_changes() {
            EditStatus::Unchanged
        } else {
            EditStatus::Applied
        };
        EditOutcome {
            status,
            diagram: next,
            diagnostics,
            changes,
        }
    }
}
