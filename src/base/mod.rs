//! Foundation types for the umlsync toolchain.
//!
//! This module provides the identifiers shared by every layer:
//! - [`ElementId`] - semantic model elements
//! - [`NodeId`], [`EdgeId`] - graphical views
//! - [`MappingId`], [`ToolId`], [`DescriptionId`] - diagram description metadata
//! - [`DiagramId`] - diagram instances
//!
//! This module has NO dependencies on other umlsync modules.

mod ids;

pub use ids::{DescriptionId, DiagramId, EdgeId, ElementId, MappingId, NodeId, ToolId};
