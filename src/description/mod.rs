//! Diagram description metadata.
//!
//! A [`DiagramDescription`] is the static definition of one diagram type:
//! the node mapping tree, the edge mappings, and the palette. It is
//! read-only during synchronization.
//!
//! ```text
//! DiagramDescription
//! ├── top_level ──────► NodeMapping ──children──► NodeMapping ...
//! │                         └──border_children──► NodeMapping
//! ├── edge_mappings ──► EdgeMapping (sources, targets: node mappings)
//! └── palette ────────► PaletteSection { node_tools, edge_tools }
//! ```

mod format;
mod mapping;
mod metadata;
mod tools;

pub use format::{DescriptionFormat, Json, Yaml, detect_format, load_description};
pub use mapping::{EdgeMapping, MappingVariant, NodeContainment, NodeMapping};
pub use metadata::{DeclaredMapping, DiagramDescription};
pub use tools::{EdgeCandidate, EdgeTool, NodeTool, PaletteSection};
