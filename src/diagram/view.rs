//! Nodes, edges, and the references between them.

use crate::base::{EdgeId, ElementId, MappingId, NodeId};
use crate::description::NodeContainment;

/// Where a node sits: directly on the diagram, or inside another node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ViewParent {
    Diagram,
    Node(NodeId),
}

impl ViewParent {
    /// The parent node ID, `None` for the diagram.
    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            Self::Diagram => None,
            Self::Node(id) => Some(id),
        }
    }
}

impl From<NodeId> for ViewParent {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<&NodeId> for ViewParent {
    fn from(id: &NodeId) -> Self {
        Self::Node(id.clone())
    }
}

impl std::fmt::Display for ViewParent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Diagram => f.write_str("<diagram>"),
            Self::Node(id) => write!(f, "{id}"),
        }
    }
}

/// The (mapping, semantic element, parent) triple identifying a node.
///
/// At most one node exists per key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ViewKey {
    pub mapping: MappingId,
    pub target: ElementId,
    pub parent: ViewParent,
}

impl ViewKey {
    pub fn new(mapping: &MappingId, target: &ElementId, parent: &ViewParent) -> Self {
        Self {
            mapping: mapping.clone(),
            target: target.clone(),
            parent: parent.clone(),
        }
    }
}

/// A graphical node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub mapping_id: MappingId,
    /// The displayed semantic element. Compartments display the element of
    /// their parent node.
    pub target_id: ElementId,
    pub parent: ViewParent,
    pub containment: NodeContainment,
    pub label: String,
    /// Child nodes, in creation order.
    pub children: Vec<NodeId>,
    /// Border nodes, in creation order.
    pub border_nodes: Vec<NodeId>,
}

impl Node {
    pub fn key(&self) -> ViewKey {
        ViewKey::new(&self.mapping_id, &self.target_id, &self.parent)
    }

    /// Child nodes followed by border nodes.
    pub fn all_children(&self) -> impl DoubleEndedIterator<Item = &NodeId> {
        self.children.iter().chain(&self.border_nodes)
    }
}

/// A domain-based edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub mapping_id: MappingId,
    /// The displayed relationship.
    pub target_id: ElementId,
    pub source: NodeId,
    pub target: NodeId,
    pub label: String,
}

/// A reference to any view of a diagram.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ViewRef {
    Node(NodeId),
    Edge(EdgeId),
}

impl From<NodeId> for ViewRef {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<EdgeId> for ViewRef {
    fn from(id: EdgeId) -> Self {
        Self::Edge(id)
    }
}
