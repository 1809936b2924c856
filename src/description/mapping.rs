//! Node and edge mappings.
//!
//! A mapping declares which metaclass a graphical element represents and
//! where it may appear. Node mappings form a tree through their child and
//! border-child lists; "reused" lists point at mappings declared elsewhere
//! (typically shared mappings) without owning them.

use smol_str::SmolStr;

use crate::base::MappingId;
use crate::semantic::ElementKind;

/// Position of a node in its parent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum NodeContainment {
    /// Regular child node (or top-level node of the diagram).
    #[default]
    Child,
    /// Node attached to the border of its parent.
    Border,
}

impl NodeContainment {
    /// Stable name used in identity derivation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Child => "child",
            Self::Border => "border",
        }
    }
}

/// Mapping variants that are only used when explicitly requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum MappingVariant {
    /// Regular, type-based mapping.
    #[default]
    Default,
    /// Representation of a metaclass imported into a profile.
    Metaclass,
}

/// Describes how a metaclass is displayed as a node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct NodeMapping {
    pub id: MappingId,
    pub name: SmolStr,
    pub domain_type: ElementKind,
    /// Child mappings declared (owned) by this mapping.
    pub children: Vec<MappingId>,
    /// Border mappings declared by this mapping.
    pub border_children: Vec<MappingId>,
    /// Child mappings declared elsewhere and reused here.
    pub reused_children: Vec<MappingId>,
    /// Border mappings declared elsewhere and reused here.
    pub reused_border_children: Vec<MappingId>,
    /// Palette-only mapping, never a creation target.
    pub shared: bool,
    /// Stands in for a node that does not exist yet, never a creation target.
    pub fake: bool,
    /// Created automatically with its parent (compartments).
    pub synchronized: bool,
    pub variant: MappingVariant,
}

impl Default for NodeMapping {
    fn default() -> Self {
        Self {
            id: MappingId::new(""),
            name: SmolStr::default(),
            domain_type: ElementKind::Element,
            children: Vec::new(),
            border_children: Vec::new(),
            reused_children: Vec::new(),
            reused_border_children: Vec::new(),
            shared: false,
            fake: false,
            synchronized: false,
            variant: MappingVariant::Default,
        }
    }
}

impl NodeMapping {
    /// Create a mapping named after its ID.
    pub fn new(id: impl Into<MappingId>, domain_type: ElementKind) -> Self {
        let id = id.into();
        Self {
            name: id.0.clone(),
            id,
            domain_type,
            ..Self::default()
        }
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<SmolStr>) -> Self {
        self.name = name.into();
        self
    }

    /// Declare a child mapping.
    pub fn with_child(mut self, id: impl Into<MappingId>) -> Self {
        self.children.push(id.into());
        self
    }

    /// Declare a border mapping.
    pub fn with_border_child(mut self, id: impl Into<MappingId>) -> Self {
        self.border_children.push(id.into());
        self
    }

    /// Reuse a child mapping declared elsewhere.
    pub fn reusing(mut self, id: impl Into<MappingId>) -> Self {
        self.reused_children.push(id.into());
        self
    }

    /// Reuse a border mapping declared elsewhere.
    pub fn reusing_border(mut self, id: impl Into<MappingId>) -> Self {
        self.reused_border_children.push(id.into());
        self
    }

    /// Flag as shared.
    pub fn shared(mut self) -> Self {
        self.shared = true;
        self
    }

    /// Flag as fake.
    pub fn fake(mut self) -> Self {
        self.fake = true;
        self
    }

    /// Flag as synchronized.
    pub fn synchronized(mut self) -> Self {
        self.synchronized = true;
        self
    }

    /// Set the metaclass variant.
    pub fn metaclass(mut self) -> Self {
        self.variant = MappingVariant::Metaclass;
        self
    }

    /// Whether this is a compartment mapping, i.e. its name carries `suffix`.
    pub fn is_compartment(&self, suffix: &str) -> bool {
        !suffix.is_empty() && self.name.ends_with(suffix)
    }

    /// The compartment category: the last `_`-separated segment of the name
    /// once `suffix` is removed (`Class_Attributes_CompartmentNode` →
    /// `Attributes`).
    pub fn compartment_category(&self, suffix: &str) -> Option<&str> {
        if !self.is_compartment(suffix) {
            return None;
        }
        let stem = self.name.strip_suffix(suffix)?;
        stem.rsplit('_').next().filter(|s| !s.is_empty())
    }

    /// Whether the mapping may be chosen as the target of a creation.
    pub fn is_creation_target(&self) -> bool {
        !self.shared && !self.fake && !self.synchronized
    }

    /// All child mappings, declared first, then reused.
    pub fn all_children(&self) -> impl Iterator<Item = &MappingId> {
        self.children.iter().chain(&self.reused_children)
    }

    /// All border mappings, declared first, then reused.
    pub fn all_border_children(&self) -> impl Iterator<Item = &MappingId> {
        self.border_children
            .iter()
            .chain(&self.reused_border_children)
    }
}

/// Describes how a relationship metaclass is displayed as a domain-based edge.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct EdgeMapping {
    pub id: MappingId,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub name: SmolStr,
    pub domain_type: ElementKind,
    /// Node mappings an edge may start from (any when empty).
    #[cfg_attr(feature = "interchange", serde(default))]
    pub sources: Vec<MappingId>,
    /// Node mappings an edge may end on (any when empty).
    #[cfg_attr(feature = "interchange", serde(default))]
    pub targets: Vec<MappingId>,
}

impl EdgeMapping {
    /// Create an edge mapping named after its ID.
    pub fn new(id: impl Into<MappingId>, domain_type: ElementKind) -> Self {
        let id = id.into();
        Self {
            name: id.0.clone(),
            id,
            domain_type,
            sources: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Allow a source node mapping.
    pub fn with_source(mut self, id: impl Into<MappingId>) -> Self {
        self.sources.push(id.into());
        self
    }

    /// Allow a target node mapping.
    pub fn with_target(mut self, id: impl Into<MappingId>) -> Self {
        self.targets.push(id.into());
        self
    }

    /// Whether a node of `mapping` can be the source end.
    pub fn accepts_source(&self, mapping: &MappingId) -> bool {
        self.sources.is_empty() || self.sources.contains(mapping)
    }

    /// Whether a node of `mapping` can be the target end.
    pub fn accepts_target(&self, mapping: &MappingId) -> bool {
        self.targets.is_empty() || self.targets.contains(mapping)
    }
}
