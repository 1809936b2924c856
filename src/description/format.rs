//! Loading diagram descriptions from YAML and JSON documents.
//!
//! ## Document Structure
//!
//! ```yaml
//! id: class-diagram
//! name: Class Diagram
//! domain_type: Package
//! top_level: [Package_Node, Class_Node]
//! node_mappings:
//!   - id: Class_Node
//!     domain_type: Class
//!     children: [Class_Attributes_CompartmentNode]
//!   - id: Class_Attributes_CompartmentNode
//!     domain_type: Class
//!     synchronized: true
//! edge_mappings:
//!   - id: Dependency_Edge
//!     domain_type: Dependency
//!     sources: [Class_Node]
//!     targets: [Class_Node]
//! palette:
//!   - name: Edges
//!     edge_tools:
//!       - id: dependency
//!         kind: Dependency
//!         mapping: Dependency_Edge
//! ```
//!
//! Mapping names default to their IDs. Every reference is validated after
//! loading.

use std::path::Path;

use super::metadata::DiagramDescription;
use crate::error::SyncError;

/// A serialization format for diagram descriptions.
pub trait DescriptionFormat: Send + Sync {
    /// Human-readable name of the format.
    fn name(&self) -> &'static str;

    /// File extensions handled by the format.
    fn extensions(&self) -> &'static [&'static str];

    /// Parse and validate a description.
    fn read(&self, input: &[u8]) -> Result<DiagramDescription, SyncError>;

    /// Serialize a description.
    fn write(&self, description: &DiagramDescription) -> Result<Vec<u8>, SyncError>;
}

/// YAML description format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

/// JSON description format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl DescriptionFormat for Yaml {
    fn name(&self) -> &'static str {
        "YAML"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yaml", "yml"]
    }

    fn read(&self, input: &[u8]) -> Result<DiagramDescription, SyncError> {
        #[cfg(feature = "interchange")]
        {
            let document: document::DescriptionDocument = serde_yaml::from_slice(input)
                .map_err(|e| SyncError::Description(format!("YAML parse error: {e}")))?;
            document.into_description()
        }
        #[cfg(not(feature = "interchange"))]
        {
            let _ = input;
            Err(unsupported("YAML reading"))
        }
    }

    fn write(&self, description: &DiagramDescription) -> Result<Vec<u8>, SyncError> {
        #[cfg(feature = "interchange")]
        {
            let document = document::DescriptionDocument::from_description(description);
            serde_yaml::to_string(&document)
                .map(String::into_bytes)
                .map_err(|e| SyncError::Description(format!("YAML write error: {e}")))
        }
        #[cfg(not(feature = "interchange"))]
        {
            let _ = description;
            Err(unsupported("YAML writing"))
        }
    }
}

impl DescriptionFormat for Json {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn read(&self, input: &[u8]) -> Result<DiagramDescription, SyncError> {
        #[cfg(feature = "interchange")]
        {
            let document: document::DescriptionDocument = serde_json::from_slice(input)
                .map_err(|e| SyncError::Description(format!("JSON parse error: {e}")))?;
            document.into_description()
        }
        #[cfg(not(feature = "interchange"))]
        {
            let _ = input;
            Err(unsupported("JSON reading"))
        }
    }

    fn write(&self, description: &DiagramDescription) -> Result<Vec<u8>, SyncError> {
        #[cfg(feature = "interchange")]
        {
            let document = document::DescriptionDocument::from_description(description);
            serde_json::to_vec_pretty(&document)
                .map_err(|e| SyncError::Description(format!("JSON write error: {e}")))
        }
        #[cfg(not(feature = "interchange"))]
        {
            let _ = description;
            Err(unsupported("JSON writing"))
        }
    }
}

#[cfg(not(feature = "interchange"))]
fn unsupported(what: &str) -> SyncError {
    SyncError::Description(format!("{what} requires the 'interchange' feature"))
}

/// Detect the format from a file extension.
pub fn detect_format(path: &Path) -> Option<Box<dyn DescriptionFormat>> {
    let ext = path.extension()?.to_str()?;
    match ext.to_lowercase().as_str() {
        "yaml" | "yml" => Some(Box::new(Yaml)),
        "json" => Some(Box::new(Json)),
        _ => None,
    }
}

/// Read a description file, picking the format from its extension.
pub fn load_description(path: &Path) -> Result<DiagramDescription, SyncError> {
    let format = detect_format(path).ok_or_else(|| {
        SyncError::Description(format!("unsupported description file: {}", path.display()))
    })?;
    let bytes = std::fs::read(path)?;
    let description = format.read(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        format = format.name(),
        description = %description.id,
        "loaded diagram description"
    );
    Ok(description)
}

#[cfg(feature = "interchange")]
mod document {
    use serde::{Deserialize, Serialize};
    use smol_str::SmolStr;

    use crate::base::{DescriptionId, MappingId};
    use crate::description::mapping::{EdgeMapping, NodeMapping};
    use crate::description::metadata::DiagramDescription;
    use crate::description::tools::PaletteSection;
    use crate::error::SyncError;
    use crate::semantic::ElementKind;

    /// On-disk shape of a description: mappings as lists instead of maps.
    #[derive(Serialize, Deserialize)]
    pub struct DescriptionDocument {
        pub id: DescriptionId,
        #[serde(default)]
        pub name: SmolStr,
        pub domain_type: ElementKind,
        #[serde(default)]
        pub top_level: Vec<MappingId>,
        #[serde(default)]
        pub node_mappings: Vec<NodeMapping>,
        #[serde(default)]
        pub edge_mappings: Vec<EdgeMapping>,
        #[serde(default)]
        pub palette: Vec<PaletteSection>,
    }

    impl DescriptionDocument {
        pub fn from_description(description: &DiagramDescription) -> Self {
            Self {
                id: description.id.clone(),
                name: description.name.clone(),
                domain_type: description.domain_type,
                top_level: description.top_level.clone(),
                node_mappings: description.node_mappings.values().cloned().collect(),
                edge_mappings: description.edge_mappings.values().cloned().collect(),
                palette: description.palette.clone(),
            }
        }

        pub fn into_description(self) -> Result<DiagramDescription, SyncError> {
            let mut description = DiagramDescription::new(self.id, self.domain_type);
            if !self.name.is_empty() {
                description.name = self.name;
            }
            description.top_level = self.top_level;
            description.palette = self.palette;

            for mut mapping in self.node_mappings {
                if mapping.name.is_empty() {
                    mapping.name = mapping.id.0.clone();
                }
                if description.node_mappings.contains_key(&mapping.id) {
                    return Err(duplicate(&mapping.id));
                }
                description.node_mappings.insert(mapping.id.clone(), mapping);
            }
            for mut mapping in self.edge_mappings {
                if mapping.name.is_empty() {
                    mapping.name = mapping.id.0.clone();
                }
                if description.edge_mappings.contains_key(&mapping.id)
                    || description.node_mappings.contains_key(&mapping.id)
                {
                    return Err(duplicate(&mapping.id));
                }
                description.edge_mappings.insert(mapping.id.clone(), mapping);
            }
            for section in &mut description.palette {
                for tool in &mut section.node_tools {
                    if tool.name.is_empty() {
                        tool.name = tool.id.0.clone();
                    }
                }
                for tool in &mut section.edge_tools {
                    if tool.name.is_empty() {
                        tool.name = tool.id.0.clone();
                    }
                }
            }

            description.validate()?;
            Ok(description)
        }
    }

    fn duplicate(id: &MappingId) -> SyncError {
        SyncError::Description(format!("duplicate mapping '{id}'"))
    }
}
