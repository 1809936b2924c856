//! Error types for synchronization operations.
//!
//! Hard failures only. Outcomes the user can simply retry or ignore
//! (unrepresentable element, edge already displayed, ...) are reported as
//! [`Diagnostic`](crate::diagnostics::Diagnostic)s instead.

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::{EdgeId, ElementId, MappingId, NodeId, ToolId};

/// Errors that can occur while editing a diagram or its semantic model.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Reference to an element that is not in the semantic model.
    #[error("Unknown element: {0}")]
    UnknownElement(ElementId),

    /// Reference to a node that is not in the diagram.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// Reference to an edge that is not in the diagram.
    #[error("Unknown edge: {0}")]
    UnknownEdge(EdgeId),

    /// Reference to a mapping the diagram description does not declare.
    #[error("Unknown mapping: {0}")]
    UnknownMapping(MappingId),

    /// Reference to a tool the diagram description does not declare.
    #[error("Unknown tool: {0}")]
    UnknownTool(ToolId),

    /// The drop cannot be performed. The message is meant for the end user.
    #[error("{0}")]
    InvalidDrop(String),

    /// The reconnection cannot be performed. The message is meant for the end user.
    #[error("{0}")]
    InvalidReconnection(String),

    /// A feature name that the owner's metaclass does not declare.
    #[error("Invalid feature '{feature}' on {owner}")]
    InvalidFeature { owner: ElementId, feature: SmolStr },

    /// Mutation of a read-only element.
    #[error("Element is not editable: {0}")]
    NotEditable(ElementId),

    /// Malformed diagram description or options.
    #[error("Invalid description: {0}")]
    Description(String),

    /// IO error while loading a description.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Create an invalid drop error.
    pub fn invalid_drop(message: impl Into<String>) -> Self {
        Self::InvalidDrop(message.into())
    }

    /// Create an invalid reconnection error.
    pub fn invalid_reconnection(message: impl Into<String>) -> Self {
        Self::InvalidReconnection(message.into())
    }

    /// Create an invalid feature error.
    pub fn invalid_feature(owner: &ElementId, feature: &str) -> Self {
        Self::InvalidFeature {
            owner: owner.clone(),
            feature: SmolStr::new(feature),
        }
    }

    /// Returns true for errors carrying a message meant for the end user.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::InvalidDrop(_) | Self::InvalidReconnection(_))
    }
}
