//! View operations: creation and deletion requests against a snapshot.
//!
//! A [`DiagramContext`] never mutates the diagram it reads. It collects
//! creation and deletion requests which the refresh pass applies in one go,
//! so an operation that fails halfway leaves the snapshot untouched.
//!
//! Requested nodes are [`PendingNode`]s. They get the same ID a persisted
//! node would get at that position, so later requests can target them as
//! parents before anything is applied.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::base::{ElementId, MappingId, NodeId};
use crate::description::{DiagramDescription, NodeContainment, NodeMapping};
use crate::diagram::{Diagram, Node, ViewKey, ViewParent};
use crate::options::SyncOptions;

/// A node requested but not yet part of the snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingNode {
    pub id: NodeId,
    pub mapping_id: MappingId,
    pub target_id: ElementId,
    pub parent: ViewParent,
    pub containment: NodeContainment,
}

/// A node as seen by an operation: already in the snapshot, or requested.
#[derive(Clone, Copy, Debug)]
pub enum ViewNode<'a> {
    Persisted(&'a Node),
    Pending(&'a PendingNode),
}

impl ViewNode<'_> {
    pub fn id(&self) -> &NodeId {
        match self {
            Self::Persisted(n) => &n.id,
            Self::Pending(n) => &n.id,
        }
    }

    pub fn mapping_id(&self) -> &MappingId {
        match self {
            Self::Persisted(n) => &n.mapping_id,
            Self::Pending(n) => &n.mapping_id,
        }
    }

    pub fn target_id(&self) -> &ElementId {
        match self {
            Self::Persisted(n) => &n.target_id,
            Self::Pending(n) => &n.target_id,
        }
    }

    pub fn parent(&self) -> &ViewParent {
        match self {
            Self::Persisted(n) => &n.parent,
            Self::Pending(n) => &n.parent,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// Restore point for [`DiagramContext::rollback`].
#[derive(Clone, Copy, Debug)]
pub struct Checkpoint {
    creations: usize,
    deletions: usize,
}

/// Pending view requests against one diagram snapshot.
#[derive(Debug)]
pub struct DiagramContext<'a> {
    diagram: &'a Diagram,
    description: &'a DiagramDescription,
    options: &'a SyncOptions,
    creations: Vec<PendingNode>,
    deletions: Vec<NodeId>,
    pending_index: FxHashMap<ViewKey, usize>,
    pending_ids: FxHashMap<NodeId, usize>,
}

impl<'a> DiagramContext<'a> {
    pub fn new(
        diagram: &'a Diagram,
        description: &'a DiagramDescription,
        options: &'a SyncOptions,
    ) -> Self {
        Self {
            diagram,
            description,
            options,
            creations: Vec::new(),
            deletions: Vec::new(),
            pending_index: FxHashMap::default(),
            pending_ids: FxHashMap::default(),
        }
    }

    pub fn diagram(&self) -> &'a Diagram {
        self.diagram
    }

    pub fn description(&self) -> &'a DiagramDescription {
        self.description
    }

    pub fn options(&self) -> &'a SyncOptions {
        self.options
    }

    // ========================================================================
    // Lookup over persisted and pending nodes
    // ========================================================================

    /// Resolve a node, persisted or pending.
    pub fn view(&self, id: &NodeId) -> Option<ViewNode<'_>> {
        if let Some(node) = self.diagram.node(id) {
            return Some(ViewNode::Persisted(node));
        }
        self.pending_ids
            .get(id)
            .map(|&i| ViewNode::Pending(&self.creations[i]))
    }

    /// The mapping of a parent view, `None` for the diagram.
    pub fn mapping_of(&self, parent: &ViewParent) -> Option<&'a NodeMapping> {
        let id = parent.node_id()?;
        let mapping_id = match self.diagram.node(id) {
            Some(node) => node.mapping_id.clone(),
            None => self.view(id)?.mapping_id().clone(),
        };
        self.description.node_mapping(&mapping_id)
    }

    /// The semantic element displayed by a parent view.
    pub fn target_of(&self, parent: &ViewParent) -> Option<ElementId> {
        match parent {
            ViewParent::Diagram => Some(self.diagram.target_id.clone()),
            ViewParent::Node(id) => self.view(id).map(|v| v.target_id().clone()),
        }
    }

    /// Whether a node exists or is requested for the triple.
    pub fn exists(&self, mapping: &MappingId, target: &ElementId, parent: &ViewParent) -> bool {
        self.diagram.find_node(mapping, target, parent).is_some()
            || self
                .pending_index
                .contains_key(&ViewKey::new(mapping, target, parent))
    }

    /// First node displaying `target`, depth-first over the snapshot, then
    /// pending nodes in request order. Nodes requested for deletion are
    /// skipped.
    pub fn find_graphical_node(&self, target: &ElementId) -> Option<ViewNode<'_>> {
        self.diagram
            .iter_dfs()
            .into_iter()
            .find(|n| &n.target_id == target && !self.is_deleted(&n.id))
            .map(ViewNode::Persisted)
            .or_else(|| {
                self.creations
                    .iter()
                    .find(|n| &n.target_id == target)
                    .map(ViewNode::Pending)
            })
    }

    /// Every node displaying `target`, persisted first.
    pub fn views_displaying(&self, target: &ElementId) -> Vec<ViewNode<'_>> {
        let mut result: Vec<ViewNode<'_>> = self
            .diagram
            .nodes_displaying(target)
            .into_iter()
            .filter(|n| !self.is_deleted(&n.id))
            .map(ViewNode::Persisted)
            .collect();
        result.extend(
            self.creations
                .iter()
                .filter(|n| &n.target_id == target)
                .map(ViewNode::Pending),
        );
        result
    }

    /// Whether `id` or one of its persisted ancestors is requested for deletion.
    pub fn is_deleted(&self, id: &NodeId) -> bool {
        self.deletions
            .iter()
            .any(|d| self.diagram.contains_in_subtree(d, id))
    }

    /// Child views of a parent, persisted first (children before border nodes).
    pub fn children_of(&self, parent: &ViewParent) -> Vec<ViewNode<'_>> {
        let mut result: Vec<ViewNode<'_>> = self
            .diagram
            .children_of(parent)
            .into_iter()
            .map(ViewNode::Persisted)
            .collect();
        result.extend(
            self.creations
                .iter()
                .filter(|n| &n.parent == parent)
                .map(ViewNode::Pending),
        );
        result
    }

    // ========================================================================
    // View operations
    // ========================================================================

    /// Build the node that a creation at this position would produce,
    /// without requesting it. Containment comes from how `mapping` is
    /// declared under the parent's mapping.
    pub fn create_placeholder_node(
        &self,
        target: &ElementId,
        parent: &ViewParent,
        mapping: &MappingId,
    ) -> PendingNode {
        let containment = self.containment_of(mapping, parent);
        PendingNode {
            id: self
                .diagram
                .derive_node_id(parent, mapping, containment, target),
            mapping_id: mapping.clone(),
            target_id: target.clone(),
            parent: parent.clone(),
            containment,
        }
    }

    /// Request a node displaying `target` with `mapping` under `parent`.
    ///
    /// Returns false without side effect when the triple is already
    /// displayed or requested, or when the parent is unknown.
    pub fn create_view(
        &mut self,
        target: &ElementId,
        parent: &ViewParent,
        mapping: &MappingId,
    ) -> bool {
        if let ViewParent::Node(id) = parent {
            if self.view(id).is_none() {
                tracing::debug!(parent = %id, "creation under unknown parent ignored");
                return false;
            }
        }
        if self.exists(mapping, target, parent) {
            tracing::trace!(%mapping, %target, %parent, "view already exists");
            return false;
        }
        let node = self.create_placeholder_node(target, parent, mapping);
        tracing::debug!(node = %node.id, %mapping, %target, %parent, "view creation requested");
        self.pending_index
            .insert(ViewKey::new(mapping, target, parent), self.creations.len());
        self.pending_ids.insert(node.id.clone(), self.creations.len());
        self.creations.push(node);
        true
    }

    /// Request the deletion of exactly `node` (with its subtree).
    pub fn delete_view(&mut self, node: &NodeId) -> bool {
        if !self.deletions.contains(node) {
            tracing::debug!(%node, "view deletion requested");
            self.deletions.push(node.clone());
        }
        true
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            creations: self.creations.len(),
            deletions: self.deletions.len(),
        }
    }

    /// Drop every request made after `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.creations.truncate(checkpoint.creations);
        self.deletions.truncate(checkpoint.deletions);
        let live: FxHashSet<&NodeId> = self.creations.iter().map(|n| &n.id).collect();
        self.pending_ids.retain(|id, _| live.contains(id));
        let count = self.creations.len();
        self.pending_index.retain(|_, i| *i < count);
    }

    pub fn has_requests(&self) -> bool {
        !self.creations.is_empty() || !self.deletions.is_empty()
    }

    pub fn creations(&self) -> &[PendingNode] {
        &self.creations
    }

    pub fn deletions(&self) -> &[NodeId] {
        &self.deletions
    }

    /// Consume the context, returning the creation and deletion requests.
    pub fn into_requests(self) -> (Vec<PendingNode>, Vec<NodeId>) {
        (self.creations, self.deletions)
    }

    fn containment_of(&self, mapping: &MappingId, parent: &ViewParent) -> NodeContainment {
        let parent_mapping = self.mapping_of(parent).map(|m| &m.id);
        self.description
            .mappings_declared_under(parent_mapping)
            .into_iter()
            .find(|d| &d.mapping.id == mapping)
            .map_or(NodeContainment::Child, |d| d.containment)
    }
}
