//! The diagram description: every mapping and tool of one diagram type.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::mapping::{EdgeMapping, NodeContainment, NodeMapping};
use super::tools::{EdgeCandidate, EdgeTool, NodeTool, PaletteSection};
use crate::base::{DescriptionId, MappingId, ToolId};
use crate::error::SyncError;
use crate::semantic::ElementKind;

/// A mapping declared under a parent mapping (or at the top level).
#[derive(Clone, Copy, Debug)]
pub struct DeclaredMapping<'a> {
    pub mapping: &'a NodeMapping,
    pub containment: NodeContainment,
    /// Declared elsewhere and referenced through a reuse list.
    pub reused: bool,
}

/// Metadata of one diagram type.
///
/// Mappings are stored flat by ID; the tree is expressed through the
/// mapping child lists and [`DiagramDescription::top_level`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagramDescription {
    pub id: DescriptionId,
    pub name: SmolStr,
    /// Metaclass of the element a diagram of this type is opened on.
    pub domain_type: ElementKind,
    pub node_mappings: IndexMap<MappingId, NodeMapping>,
    pub edge_mappings: IndexMap<MappingId, EdgeMapping>,
    /// Mappings of the diagram's top-level nodes.
    pub top_level: Vec<MappingId>,
    pub palette: Vec<PaletteSection>,
}

impl DiagramDescription {
    /// Create an empty description.
    pub fn new(id: impl Into<DescriptionId>, domain_type: ElementKind) -> Self {
        let id = id.into();
        Self {
            name: id.0.clone(),
            id,
            domain_type,
            node_mappings: IndexMap::new(),
            edge_mappings: IndexMap::new(),
            top_level: Vec::new(),
            palette: Vec::new(),
        }
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<SmolStr>) -> Self {
        self.name = name.into();
        self
    }

    /// Register a node mapping (not yet placed in the tree).
    pub fn with_node_mapping(mut self, mapping: NodeMapping) -> Self {
        self.node_mappings.insert(mapping.id.clone(), mapping);
        self
    }

    /// Register a node mapping and declare it at the top level.
    pub fn with_top_level(mut self, mapping: NodeMapping) -> Self {
        self.top_level.push(mapping.id.clone());
        self.with_node_mapping(mapping)
    }

    /// Register an edge mapping.
    pub fn with_edge_mapping(mut self, mapping: EdgeMapping) -> Self {
        self.edge_mappings.insert(mapping.id.clone(), mapping);
        self
    }

    /// Add a palette section.
    pub fn with_section(mut self, section: PaletteSection) -> Self {
        self.palette.push(section);
        self
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn node_mapping(&self, id: &MappingId) -> Option<&NodeMapping> {
        self.node_mappings.get(id)
    }

    pub fn edge_mapping(&self, id: &MappingId) -> Option<&EdgeMapping> {
        self.edge_mappings.get(id)
    }

    /// Look up a node mapping, failing with [`SyncError::UnknownMapping`].
    pub fn require_node_mapping(&self, id: &MappingId) -> Result<&NodeMapping, SyncError> {
        self.node_mapping(id)
            .ok_or_else(|| SyncError::UnknownMapping(id.clone()))
    }

    /// Mappings declared directly under `parent` (the top level for `None`):
    /// children, border children, and reused mappings, deduplicated by ID in
    /// declaration order.
    pub fn mappings_declared_under(&self, parent: Option<&MappingId>) -> Vec<DeclaredMapping<'_>> {
        let mut seen = FxHashSet::default();
        let mut result = Vec::new();
        let mut push = |id: &MappingId, containment, reused| {
            if !seen.insert(id.clone()) {
                return;
            }
            if let Some(mapping) = self.node_mappings.get(id) {
                result.push(DeclaredMapping {
                    mapping,
                    containment,
                    reused,
                });
            }
        };

        match parent {
            None => {
                for id in &self.top_level {
                    push(id, NodeContainment::Child, false);
                }
            }
            Some(parent) => {
                let Some(parent) = self.node_mappings.get(parent) else {
                    return Vec::new();
                };
                for id in &parent.children {
                    push(id, NodeContainment::Child, false);
                }
                for id in &parent.border_children {
                    push(id, NodeContainment::Border, false);
                }
                for id in &parent.reused_children {
                    push(id, NodeContainment::Child, true);
                }
                for id in &parent.reused_border_children {
                    push(id, NodeContainment::Border, true);
                }
            }
        }
        result
    }

    /// Whether `mapping` is declared (or reused) directly under `parent`.
    pub fn is_declared_under(&self, mapping: &MappingId, parent: Option<&MappingId>) -> bool {
        self.mappings_declared_under(parent)
            .iter()
            .any(|d| &d.mapping.id == mapping)
    }

    /// Synchronized compartment mappings declared under `parent`.
    pub fn compartments_of(&self, parent: &MappingId, suffix: &str) -> Vec<&NodeMapping> {
        self.mappings_declared_under(Some(parent))
            .into_iter()
            .map(|d| d.mapping)
            .filter(|m| m.synchronized && m.is_compartment(suffix))
            .collect()
    }

    /// Edge mappings able to display an element of `kind`: those whose
    /// domain type is closest to `kind` in the generalization graph.
    pub fn edge_mappings_for(&self, kind: ElementKind) -> Vec<&EdgeMapping> {
        let ranked: Vec<(usize, &EdgeMapping)> = self
            .edge_mappings
            .values()
            .filter_map(|m| kind.distance_to(m.domain_type).map(|d| (d, m)))
            .collect();
        let Some(best) = ranked.iter().map(|(d, _)| *d).min() else {
            return Vec::new();
        };
        ranked
            .into_iter()
            .filter(|(d, _)| *d == best)
            .map(|(_, m)| m)
            .collect()
    }

    // ========================================================================
    // Tools
    // ========================================================================

    /// All node tools, section by section.
    pub fn node_tools(&self) -> impl Iterator<Item = &NodeTool> {
        self.palette.iter().flat_map(|s| &s.node_tools)
    }

    /// All edge tools, section by section.
    pub fn edge_tools(&self) -> impl Iterator<Item = &EdgeTool> {
        self.palette.iter().flat_map(|s| &s.edge_tools)
    }

    pub fn node_tool(&self, id: &ToolId) -> Option<&NodeTool> {
        self.node_tools().find(|t| &t.id == id)
    }

    pub fn edge_tool(&self, id: &ToolId) -> Option<&EdgeTool> {
        self.edge_tools().find(|t| &t.id == id)
    }

    /// The (sources, targets) pairs a tool accepts.
    pub fn candidate_pairs<'a>(&self, tool: &'a EdgeTool) -> &'a [EdgeCandidate] {
        &tool.candidates
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check that every mapping and tool reference resolves.
    pub fn validate(&self) -> Result<(), SyncError> {
        let missing_node = |id: &MappingId, context: &str| {
            if self.node_mappings.contains_key(id) {
                Ok(())
            } else {
                Err(SyncError::Description(format!(
                    "{context} references unknown node mapping '{id}'"
                )))
            }
        };

        for id in &self.top_level {
            missing_node(id, "top level")?;
        }
        for mapping in self.node_mappings.values() {
            let context = format!("node mapping '{}'", mapping.id);
            for id in mapping.all_children().chain(mapping.all_border_children()) {
                missing_node(id, &context)?;
            }
        }
        for mapping in self.edge_mappings.values() {
            let context = format!("edge mapping '{}'", mapping.id);
            for id in mapping.sources.iter().chain(&mapping.targets) {
                missing_node(id, &context)?;
            }
        }

        let mut tool_ids = FxHashSet::default();
        for tool in self.node_tools() {
            if !tool_ids.insert(tool.id.clone()) {
                return Err(SyncError::Description(format!("duplicate tool '{}'", tool.id)));
            }
            let context = format!("node tool '{}'", tool.id);
            for id in &tool.targets {
                missing_node(id, &context)?;
            }
        }
        for tool in self.edge_tools() {
            if !tool_ids.insert(tool.id.clone()) {
                return Err(SyncError::Description(format!("duplicate tool '{}'", tool.id)));
            }
            if !self.edge_mappings.contains_key(&tool.mapping) {
                return Err(SyncError::Description(format!(
                    "edge tool '{}' references unknown edge mapping '{}'",
                    tool.id, tool.mapping
                )));
            }
            let context = format!("edge tool '{}'", tool.id);
            for candidate in &tool.candidates {
                for id in candidate.sources.iter().chain(&candidate.targets) {
                    missing_node(id, &context)?;
                }
            }
        }
        Ok(())
    }
}
