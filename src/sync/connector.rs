//! Edge tools available between two displayed elements.

use crate::base::{ElementId, NodeId};
use crate::description::{DiagramDescription, EdgeTool};
use crate::diagnostics::{Diagnostics, Reported, codes};
use crate::diagram::Diagram;
use crate::error::SyncError;
use crate::semantic::SemanticModel;

/// Filters the palette's edge tools by their candidate mapping pairs.
#[derive(Clone, Copy, Debug)]
pub struct ConnectorToolResolver<'a> {
    description: &'a DiagramDescription,
}

impl<'a> ConnectorToolResolver<'a> {
    pub fn new(description: &'a DiagramDescription) -> Self {
        Self { description }
    }

    /// Edge tools that can connect `source` to `target`.
    ///
    /// An empty list is a normal outcome, reported with a warning naming
    /// both element kinds.
    pub fn connector_tools(
        &self,
        model: &dyn SemanticModel,
        diagram: &Diagram,
        source: &NodeId,
        target: &NodeId,
    ) -> Result<Reported<Vec<&'a EdgeTool>>, SyncError> {
        let source = diagram
            .node(source)
            .ok_or_else(|| SyncError::UnknownNode(source.clone()))?;
        let target = diagram
            .node(target)
            .ok_or_else(|| SyncError::UnknownNode(target.clone()))?;
        let source_mapping = self.description.require_node_mapping(&source.mapping_id)?;
        let target_mapping = self.description.require_node_mapping(&target.mapping_id)?;

        let tools: Vec<&'a EdgeTool> = self
            .description
            .edge_tools()
            .filter(|tool| {
                self.description
                    .candidate_pairs(tool)
                    .iter()
                    .any(|pair| pair.accepts(&source_mapping.id, &target_mapping.id))
            })
            .collect();

        let mut diagnostics = Diagnostics::new();
        if tools.is_empty() {
            let kind_of = |id: &ElementId| {
                model
                    .resolve(id)
                    .map_or_else(|| "unknown element".to_string(), |e| e.kind.to_string())
            };
            diagnostics.warn(
                codes::NO_CONNECTOR_TOOL,
                format!(
                    "No edge tool connects {} to {}",
                    kind_of(&source.target_id),
                    kind_of(&target.target_id)
                ),
            );
        }
        Ok(Reported::new(tools, diagnostics))
    }
}
