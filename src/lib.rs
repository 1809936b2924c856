//! # umlsync-base
//!
//! Core library for UML diagram synchronization: keeping a graphical
//! diagram consistent with the semantic model it displays, and reconciling
//! drag-and-drop gestures.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! sync        → Coordinator, drop reconciliation, refresh, connector tools
//!   ↓
//! diagram     → Snapshots (nodes, edges, index), deterministic view IDs
//!   ↓
//! description → Node/edge mappings, palette tools, YAML/JSON loading
//!   ↓
//! semantic    → UML metaclasses, in-memory model, SemanticModel trait
//!   ↓
//! base        → Primitives (element, view, mapping and tool IDs)
//! ```
//!
//! `error`, `diagnostics` and `options` are shared by every layer above
//! `base`.
//!
//! ## Example
//!
//! ```
//! use umlsync::description::{DiagramDescription, NodeMapping};
//! use umlsync::semantic::{Element, ElementKind, Model};
//! use umlsync::sync::DiagramSyncCoordinator;
//! use umlsync::diagram::ViewParent;
//!
//! let description = DiagramDescription::new("ClassDiagram", ElementKind::Package)
//!     .with_top_level(NodeMapping::new("Class_Node", ElementKind::Class));
//! let mut model = Model::new();
//! let root = model.add_root(Element::new("root", ElementKind::Model));
//! let class = model.add_owned(&root, Element::new("c", ElementKind::Class)).unwrap();
//!
//! let coordinator = DiagramSyncCoordinator::new(&description);
//! let diagram = coordinator.create_diagram(&model, &root).unwrap();
//! let outcome = coordinator
//!     .drop_semantic(&model, &diagram, &class, &ViewParent::Diagram)
//!     .unwrap();
//! assert_eq!(outcome.diagram.node_count(), 1);
//! ```

// ============================================================================
// MODULES (dependency order: base → semantic → description → diagram → sync)
// ============================================================================

/// Foundation types: element, view and metadata identifiers
pub mod base;

/// Semantic model: metaclasses, elements, change tracking
pub mod semantic;

/// Diagram descriptions: mappings and palette tools
pub mod description;

/// Diagram snapshots and view identity
pub mod diagram;

/// Synchronization and drop reconciliation
pub mod sync;

/// Error types
pub mod error;

/// Diagnostics returned by every operation
pub mod diagnostics;

/// Synchronization options
pub mod options;

// Re-export foundation types
pub use base::{DescriptionId, DiagramId, EdgeId, ElementId, MappingId, NodeId, ToolId};

// Re-export the main entry points
pub use diagnostics::{Diagnostic, Diagnostics, Reported, Severity};
pub use error::SyncError;
pub use options::SyncOptions;
pub use sync::{DiagramSyncCoordinator, EditOutcome, EditStatus};
