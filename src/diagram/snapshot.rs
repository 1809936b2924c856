//! The diagram snapshot: the node tree, its edges, and the view index.
//!
//! ```text
//! Diagram
//! ├── nodes: IndexMap<NodeId, Node>   (creation order)
//! ├── roots: Vec<NodeId>              (top-level nodes)
//! ├── edges: IndexMap<EdgeId, Edge>
//! └── index: (mapping, element, parent) → NodeId
//! ```
//!
//! Mutation is restricted to the crate; callers outside only read snapshots
//! and hand them back to the coordinator.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use super::identity;
use super::view::{Edge, Node, ViewKey, ViewParent};
use crate::base::{DescriptionId, DiagramId, EdgeId, ElementId, MappingId, NodeId};
use crate::description::NodeContainment;

/// A broken structural invariant, as reported by [`Diagram::check_invariants`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Two nodes share a (mapping, element, parent) triple.
    DuplicateView { first: NodeId, second: NodeId },
    /// A node's parent does not exist or does not list it.
    DanglingParent(NodeId),
    /// A node lists a child that does not exist.
    DanglingChild { parent: NodeId, child: NodeId },
    /// A node is missing from the index or indexed under another key.
    IndexMismatch(NodeId),
    /// A node's ID does not match its position.
    IdentityMismatch(NodeId),
    /// An edge endpoint does not exist.
    DanglingEdge(EdgeId),
}

/// A diagram at one point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagram {
    pub id: DiagramId,
    pub description_id: DescriptionId,
    /// The semantic element the diagram is opened on.
    pub target_id: ElementId,
    nodes: IndexMap<NodeId, Node>,
    roots: Vec<NodeId>,
    edges: IndexMap<EdgeId, Edge>,
    index: FxHashMap<ViewKey, NodeId>,
}

impl Diagram {
    /// Create an empty diagram.
    pub fn new(description_id: DescriptionId, target_id: ElementId) -> Self {
        Self {
            id: identity::diagram_id(&description_id, &target_id),
            description_id,
            target_id,
            nodes: IndexMap::new(),
            roots: Vec::new(),
            edges: IndexMap::new(),
            index: FxHashMap::default(),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// All nodes, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The node displaying `target` with `mapping` directly under `parent`.
    pub fn find_node(
        &self,
        mapping: &MappingId,
        target: &ElementId,
        parent: &ViewParent,
    ) -> Option<&Node> {
        let key = ViewKey::new(mapping, target, parent);
        self.index.get(&key).and_then(|id| self.nodes.get(id))
    }

    /// Direct children of `parent` (children first, then border nodes).
    pub fn children_of(&self, parent: &ViewParent) -> Vec<&Node> {
        match parent {
            ViewParent::Diagram => self.roots.iter().filter_map(|id| self.node(id)).collect(),
            ViewParent::Node(id) => self
                .node(id)
                .map(|n| n.all_children().filter_map(|c| self.node(c)).collect())
                .unwrap_or_default(),
        }
    }

    /// Depth-first traversal of the whole tree, border nodes included.
    pub fn iter_dfs(&self) -> Vec<&Node> {
        let mut result = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<&NodeId> = self.roots.iter().rev().collect();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(id) {
                result.push(node);
                stack.extend(node.all_children().rev());
            }
        }
        result
    }

    /// Every node displaying `target`, in depth-first order.
    pub fn nodes_displaying(&self, target: &ElementId) -> Vec<&Node> {
        self.iter_dfs()
            .into_iter()
            .filter(|n| &n.target_id == target)
            .collect()
    }

    /// Every edge displaying `target`.
    pub fn edges_displaying(&self, target: &ElementId) -> Vec<&Edge> {
        self.edges
            .values()
            .filter(|e| &e.target_id == target)
            .collect()
    }

    /// All nodes below `id`, depth-first (excluding `id`).
    pub fn descendants(&self, id: &NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = match self.node(id) {
            Some(n) => n.all_children().rev().cloned().collect(),
            None => return result,
        };
        while let Some(current) = stack.pop() {
            if let Some(n) = self.node(&current) {
                stack.extend(n.all_children().rev().cloned());
            }
            result.push(current);
        }
        result
    }

    /// Whether `candidate` is `root` or lies below it.
    pub fn contains_in_subtree(&self, root: &NodeId, candidate: &NodeId) -> bool {
        let mut current = self.node(candidate);
        while let Some(node) = current {
            if &node.id == root {
                return true;
            }
            current = node.parent.node_id().and_then(|p| self.node(p));
        }
        false
    }

    /// The semantic element displayed by `parent` (the diagram target for
    /// the diagram itself).
    pub fn target_of(&self, parent: &ViewParent) -> Option<&ElementId> {
        match parent {
            ViewParent::Diagram => Some(&self.target_id),
            ViewParent::Node(id) => self.node(id).map(|n| &n.target_id),
        }
    }

    /// The ID a node would get at the given position.
    pub fn derive_node_id(
        &self,
        parent: &ViewParent,
        mapping: &MappingId,
        containment: NodeContainment,
        target: &ElementId,
    ) -> NodeId {
        identity::node_id(&self.id, parent, mapping, containment, target)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert a node under `parent`. Returns the new node's ID, or `None`
    /// when the triple is already displayed or the parent does not exist.
    pub(crate) fn insert_node(
        &mut self,
        parent: ViewParent,
        mapping: MappingId,
        containment: NodeContainment,
        target: ElementId,
        label: String,
    ) -> Option<NodeId> {
        let key = ViewKey::new(&mapping, &target, &parent);
        if self.index.contains_key(&key) {
            return None;
        }
        let id = self.derive_node_id(&parent, &mapping, containment, &target);
        match &parent {
            ViewParent::Diagram => self.roots.push(id.clone()),
            ViewParent::Node(parent_id) => {
                let parent_node = self.nodes.get_mut(parent_id)?;
                match containment {
                    NodeContainment::Child => parent_node.children.push(id.clone()),
                    NodeContainment::Border => parent_node.border_nodes.push(id.clone()),
                }
            }
        }
        self.index.insert(key, id.clone());
        self.nodes.insert(
            id.clone(),
            Node {
                id: id.clone(),
                mapping_id: mapping,
                target_id: target,
                parent,
                containment,
                label,
                children: Vec::new(),
                border_nodes: Vec::new(),
            },
        );
        Some(id)
    }

    /// Remove a node with its subtree and every edge attached to it.
    /// Returns the removed node IDs, the subtree root first.
    pub(crate) fn remove_subtree(&mut self, id: &NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        let parent = node.parent.clone();
        match &parent {
            ViewParent::Diagram => self.roots.retain(|r| r != id),
            ViewParent::Node(parent_id) => {
                if let Some(p) = self.nodes.get_mut(parent_id) {
                    p.children.retain(|c| c != id);
                    p.border_nodes.retain(|c| c != id);
                }
            }
        }

        let mut removed = vec![id.clone()];
        removed.extend(self.descendants(id));
        for node_id in &removed {
            if let Some(node) = self.nodes.shift_remove(node_id) {
                self.index.remove(&node.key());
            }
        }
        self.edges
            .retain(|_, e| !removed.contains(&e.source) && !removed.contains(&e.target));
        removed
    }

    pub(crate) fn set_node_label(&mut self, id: &NodeId, label: String) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.label = label;
        }
    }

    /// Replace every edge.
    pub(crate) fn replace_edges(&mut self, edges: impl IntoIterator<Item = Edge>) {
        self.edges = edges.into_iter().map(|e| (e.id.clone(), e)).collect();
    }

    // ========================================================================
    // Invariants
    // ========================================================================

    /// Check the structural invariants of the snapshot. Returns every
    /// violation found, empty when the snapshot is consistent.
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();
        let mut seen: FxHashMap<ViewKey, &NodeId> = FxHashMap::default();

        for node in self.nodes.values() {
            let key = node.key();
            if let Some(first) = seen.insert(key.clone(), &node.id) {
                violations.push(InvariantViolation::DuplicateView {
                    first: first.clone(),
                    second: node.id.clone(),
                });
            }
            if self.index.get(&key) != Some(&node.id) {
                violations.push(InvariantViolation::IndexMismatch(node.id.clone()));
            }
            let expected =
                self.derive_node_id(&node.parent, &node.mapping_id, node.containment, &node.target_id);
            if expected != node.id {
                violations.push(InvariantViolation::IdentityMismatch(node.id.clone()));
            }

            let listed = match &node.parent {
                ViewParent::Diagram => self.roots.contains(&node.id),
                ViewParent::Node(parent) => self.nodes.get(parent).is_some_and(|p| {
                    p.children.contains(&node.id) || p.border_nodes.contains(&node.id)
                }),
            };
            if !listed {
                violations.push(InvariantViolation::DanglingParent(node.id.clone()));
            }
            for child in node.all_children() {
                if !self.nodes.contains_key(child) {
                    violations.push(InvariantViolation::DanglingChild {
                        parent: node.id.clone(),
                        child: child.clone(),
                    });
                }
            }
        }
        if self.index.len() != self.nodes.len() {
            for (key, id) in &self.index {
                if self.nodes.get(id).map(Node::key).as_ref() != Some(key) {
                    violations.push(InvariantViolation::IndexMismatch(id.clone()));
                }
            }
        }
        for edge in self.edges.values() {
            if !self.nodes.contains_key(&edge.source) || !self.nodes.contains_key(&edge.target) {
                violations.push(InvariantViolation::DanglingEdge(edge.id.clone()));
            }
        }
        violations
    }
}
