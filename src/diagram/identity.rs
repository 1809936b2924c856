//! Deterministic view identity.
//!
//! A view ID is a name-based (v5) UUID of its position in the tree, so
//! re-creating the same view always yields the same ID and two creation
//! requests for the same position collapse into one:
//!
//! ```text
//! node  = uuid5(NS, "node" + [<parent>, <mapping>, <containment>, <element>])
//! edge  = uuid5(NS, "edge" + [<mapping>, <element>, <source node>, <target node>])
//! ```
//!
//! `<parent>` is the parent node ID, or the diagram ID for top-level nodes.
//! Each part is written as `<byte length>:<part>`, so IDs containing the
//! separator cannot make two positions share a key.

use uuid::Uuid;

use super::view::ViewParent;
use crate::base::{DescriptionId, DiagramId, EdgeId, ElementId, MappingId, NodeId};
use crate::description::NodeContainment;

const NAMESPACE: Uuid = Uuid::from_u128(0x3c1f_9a52_7d0e_4b8a_9e61_5b2d_c4f0_a817);

fn derive(kind: &str, parts: &[&str]) -> String {
    let mut key = String::from(kind);
    for part in parts {
        key.push('|');
        key.push_str(&part.len().to_string());
        key.push(':');
        key.push_str(part);
    }
    Uuid::new_v5(&NAMESPACE, key.as_bytes()).to_string()
}

/// ID of the diagram of type `description` opened on `target`.
pub fn diagram_id(description: &DescriptionId, target: &ElementId) -> DiagramId {
    DiagramId::new(derive("diagram", &[description.as_str(), target.as_str()]))
}

/// ID of the node displaying `target` with `mapping` under `parent`.
pub fn node_id(
    diagram: &DiagramId,
    parent: &ViewParent,
    mapping: &MappingId,
    containment: NodeContainment,
    target: &ElementId,
) -> NodeId {
    let parent = match parent {
        ViewParent::Diagram => diagram.as_str(),
        ViewParent::Node(id) => id.as_str(),
    };
    NodeId::new(derive(
        "node",
        &[parent, mapping.as_str(), containment.as_str(), target.as_str()],
    ))
}

/// ID of the edge displaying `target` with `mapping` between two nodes.
pub fn edge_id(mapping: &MappingId, target: &ElementId, source: &NodeId, end: &NodeId) -> EdgeId {
    EdgeId::new(derive(
        "edge",
        &[mapping.as_str(), target.as_str(), source.as_str(), end.as_str()],
    ))
}
