//! String-backed identifiers.
//!
//! All identifiers wrap a [`SmolStr`] so they are cheap to clone and can be
//! used as map keys across the semantic model, the diagram snapshot and the
//! description metadata.

use smol_str::SmolStr;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(
            feature = "interchange",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        pub struct $name(pub SmolStr);

        impl $name {
            /// Create a new identifier.
            pub fn new(id: impl Into<SmolStr>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&$name> for $name {
            fn from(id: &$name) -> Self {
                id.clone()
            }
        }
    };
}

string_id! {
    /// Unique identifier of a semantic model element.
    ElementId
}

impl ElementId {
    /// Generate a fresh random (v4 UUID) identifier.
    pub fn generate() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }
}

string_id! {
    /// Identifier of a graphical node.
    ///
    /// Derived deterministically from the node's position in the tree, see
    /// [`crate::diagram::identity`].
    NodeId
}

string_id! {
    /// Identifier of a graphical edge.
    EdgeId
}

string_id! {
    /// Identifier of a node or edge mapping in a diagram description.
    MappingId
}

string_id! {
    /// Identifier of a palette tool.
    ToolId
}

string_id! {
    /// Identifier of a diagram description (the diagram "type").
    DescriptionId
}

string_id! {
    /// Identifier of a diagram instance.
    DiagramId
}
