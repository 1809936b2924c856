//! Palette tools.

use smol_str::SmolStr;

use crate::base::{MappingId, ToolId};
use crate::semantic::ElementKind;

/// A tool creating a semantic element and its node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NodeTool {
    pub id: ToolId,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub name: SmolStr,
    /// Metaclass of the created element.
    pub kind: ElementKind,
    /// Containment feature receiving the element; the default feature of
    /// the container when unset.
    #[cfg_attr(feature = "interchange", serde(default))]
    pub feature: Option<SmolStr>,
    /// Node mappings the tool is offered on. The tool is offered on the
    /// diagram background when `on_diagram` is set.
    #[cfg_attr(feature = "interchange", serde(default))]
    pub targets: Vec<MappingId>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub on_diagram: bool,
}

impl NodeTool {
    /// Create a tool named after its ID.
    pub fn new(id: impl Into<ToolId>, kind: ElementKind) -> Self {
        let id = id.into();
        Self {
            name: id.0.clone(),
            id,
            kind,
            feature: None,
            targets: Vec::new(),
            on_diagram: false,
        }
    }

    /// Set the containment feature.
    pub fn with_feature(mut self, feature: impl Into<SmolStr>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    /// Offer the tool on nodes of `mapping`.
    pub fn on(mut self, mapping: impl Into<MappingId>) -> Self {
        self.targets.push(mapping.into());
        self
    }

    /// Offer the tool on the diagram background.
    pub fn on_diagram(mut self) -> Self {
        self.on_diagram = true;
        self
    }
}

/// One accepted (sources, targets) combination of an edge tool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct EdgeCandidate {
    pub sources: Vec<MappingId>,
    pub targets: Vec<MappingId>,
}

impl EdgeCandidate {
    /// Create a candidate pair.
    pub fn new(
        sources: impl IntoIterator<Item = impl Into<MappingId>>,
        targets: impl IntoIterator<Item = impl Into<MappingId>>,
    ) -> Self {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the pair accepts the given source and target mappings.
    pub fn accepts(&self, source: &MappingId, target: &MappingId) -> bool {
        self.sources.contains(source) && self.targets.contains(target)
    }
}

/// A two-point tool creating a relationship between two displayed elements.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct EdgeTool {
    pub id: ToolId,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub name: SmolStr,
    /// Metaclass of the created relationship.
    pub kind: ElementKind,
    /// Edge mapping displaying the created relationship.
    pub mapping: MappingId,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub candidates: Vec<EdgeCandidate>,
}

impl EdgeTool {
    /// Create a tool named after its ID.
    pub fn new(id: impl Into<ToolId>, kind: ElementKind, mapping: impl Into<MappingId>) -> Self {
        let id = id.into();
        Self {
            name: id.0.clone(),
            id,
            kind,
            mapping: mapping.into(),
            candidates: Vec::new(),
        }
    }

    /// Add a candidate pair.
    pub fn with_candidate(mut self, candidate: EdgeCandidate) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// Whether any candidate accepts the given source and target mappings.
    pub fn accepts(&self, source: &MappingId, target: &MappingId) -> bool {
        self.candidates.iter().any(|c| c.accepts(source, target))
    }
}

/// A named group of palette tools.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PaletteSection {
    pub name: SmolStr,
    pub node_tools: Vec<NodeTool>,
    pub edge_tools: Vec<EdgeTool>,
}

impl PaletteSection {
    /// Create an empty section.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a node tool.
    pub fn with_node_tool(mut self, tool: NodeTool) -> Self {
        self.node_tools.push(tool);
        self
    }

    /// Add an edge tool.
    pub fn with_edge_tool(mut self, tool: EdgeTool) -> Self {
        self.edge_tools.push(tool);
        self
    }
}
