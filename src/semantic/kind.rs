//! UML metaclasses, their generalization graph and containment rules.
//!
//! The hierarchy is a multi-parent graph (as in the UML metamodel) reduced to
//! the metaclasses the diagrams work with. Abstract metaclasses appear only
//! as supertypes and as mapping domain types.

use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// The metaclass of a semantic element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ElementKind {
    // Abstract metaclasses
    Element,
    NamedElement,
    Namespace,
    PackageableElement,
    Type,
    Classifier,
    StructuredClassifier,
    BehavioredClassifier,
    Behavior,
    Feature,
    StructuralFeature,
    Relationship,
    DirectedRelationship,
    ActivityNode,
    ActivityGroup,
    ActivityEdge,
    Action,
    ControlNode,
    Pin,
    Vertex,
    InteractionFragment,

    // Packages
    Model,
    Package,
    Profile,

    // Classifiers
    Class,
    Interface,
    DataType,
    Enumeration,
    PrimitiveType,
    Component,
    Signal,
    Stereotype,
    Actor,
    UseCase,

    // Behaviors
    Activity,
    StateMachine,
    Interaction,

    // Features and misc
    Property,
    Port,
    Operation,
    EnumerationLiteral,
    Comment,
    Constraint,

    // Activities
    ActivityPartition,
    InterruptibleActivityRegion,
    OpaqueAction,
    CallBehaviorAction,
    InitialNode,
    ActivityFinalNode,
    DecisionNode,
    MergeNode,
    ForkNode,
    JoinNode,
    InputPin,
    OutputPin,
    ControlFlow,
    ObjectFlow,

    // State machines
    Region,
    State,
    FinalState,
    Pseudostate,
    Transition,

    // Interactions
    Lifeline,
    MessageOccurrenceSpecification,
    Message,

    // Composite structures
    Connector,
    ConnectorEnd,

    // Relationships
    Dependency,
    Abstraction,
    Realization,
    InterfaceRealization,
    Substitution,
    Usage,
    Generalization,
    Association,
    Extension,
    Include,
    Extend,
    PackageImport,
    PackageMerge,
    ElementImport,
}

use ElementKind as K;

/// The kinds of domain-based edges, each with its own endpoint rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeCategory {
    /// Dependencies, generalizations, associations, imports, include/extend.
    Relationship,
    /// Control and object flows.
    ActivityEdge,
    /// Connectors between parts and ports.
    Connector,
    /// Messages between lifelines.
    Message,
    /// State machine transitions.
    Transition,
}

impl ElementKind {
    /// Direct supertypes in the generalization graph.
    pub fn direct_supertypes(&self) -> &'static [ElementKind] {
        match self {
            K::Element => &[],
            K::NamedElement | K::Comment | K::Relationship | K::ConnectorEnd => &[K::Element],
            K::Namespace
            | K::PackageableElement
            | K::Feature
            | K::ActivityNode
            | K::ActivityGroup
            | K::ActivityEdge
            | K::Vertex
            | K::InteractionFragment
            | K::Lifeline
            | K::Message
            | K::EnumerationLiteral => &[K::NamedElement],
            K::Type | K::Constraint => &[K::PackageableElement],
            K::Classifier => &[K::Namespace, K::Type],
            K::StructuredClassifier | K::BehavioredClassifier => &[K::Classifier],
            K::Class => &[K::StructuredClassifier, K::BehavioredClassifier],
            K::Behavior | K::Component | K::Stereotype => &[K::Class],
            K::Activity | K::StateMachine | K::Interaction => &[K::Behavior],
            K::StructuralFeature => &[K::Feature],
            K::Property => &[K::StructuralFeature],
            K::Port => &[K::Property],
            K::Operation => &[K::Feature, K::Namespace],
            K::DirectedRelationship => &[K::Relationship],

            K::Package => &[K::Namespace, K::PackageableElement],
            K::Model | K::Profile => &[K::Package],

            K::Interface | K::DataType | K::Signal => &[K::Classifier],
            K::Enumeration | K::PrimitiveType => &[K::DataType],
            K::Actor | K::UseCase => &[K::BehavioredClassifier],

            K::ActivityPartition | K::InterruptibleActivityRegion => &[K::ActivityGroup],
            K::Action | K::ControlNode | K::Pin => &[K::ActivityNode],
            K::OpaqueAction | K::CallBehaviorAction => &[K::Action],
            K::InitialNode | K::ActivityFinalNode | K::DecisionNode | K::MergeNode | K::ForkNode
            | K::JoinNode => &[K::ControlNode],
            K::InputPin | K::OutputPin => &[K::Pin],
            K::ControlFlow | K::ObjectFlow => &[K::ActivityEdge],

            K::Region => &[K::Namespace],
            K::State => &[K::Vertex, K::Namespace],
            K::FinalState => &[K::State],
            K::Pseudostate => &[K::Vertex],
            K::Transition => &[K::Namespace],

            K::MessageOccurrenceSpecification => &[K::InteractionFragment],

            K::Connector => &[K::Feature],

            K::Dependency => &[K::DirectedRelationship, K::PackageableElement],
            K::Abstraction | K::Usage => &[K::Dependency],
            K::Realization => &[K::Abstraction],
            K::InterfaceRealization | K::Substitution => &[K::Realization],
            K::Generalization | K::PackageImport | K::PackageMerge | K::ElementImport => {
                &[K::DirectedRelationship]
            }
            K::Association => &[K::Relationship, K::Classifier],
            K::Extension => &[K::Association],
            K::Include | K::Extend => &[K::DirectedRelationship, K::NamedElement],
        }
    }

    /// Number of generalization steps from `self` up to `ancestor`.
    ///
    /// Returns `Some(0)` for the type itself and `None` when `ancestor` is
    /// not a supertype. Multiple paths resolve to the shortest one.
    pub fn distance_to(&self, ancestor: ElementKind) -> Option<usize> {
        if *self == ancestor {
            return Some(0);
        }
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::from([(*self, 0usize)]);
        while let Some((kind, depth)) = queue.pop_front() {
            for &parent in kind.direct_supertypes() {
                if parent == ancestor {
                    return Some(depth + 1);
                }
                if visited.insert(parent) {
                    queue.push_back((parent, depth + 1));
                }
            }
        }
        None
    }

    /// Returns true if `self` is `other` or one of its subtypes.
    pub fn is_a(&self, other: ElementKind) -> bool {
        self.distance_to(other).is_some()
    }

    /// Returns true for metaclasses that cannot be instantiated.
    pub fn is_abstract(&self) -> bool {
        matches!(
            self,
            K::Element
                | K::NamedElement
                | K::Namespace
                | K::PackageableElement
                | K::Type
                | K::Classifier
                | K::StructuredClassifier
                | K::BehavioredClassifier
                | K::Behavior
                | K::Feature
                | K::StructuralFeature
                | K::Relationship
                | K::DirectedRelationship
                | K::ActivityNode
                | K::ActivityGroup
                | K::ActivityEdge
                | K::Action
                | K::ControlNode
                | K::Pin
                | K::Vertex
                | K::InteractionFragment
        )
    }

    /// The edge category of this kind, if it is displayed as a domain-based edge.
    pub fn edge_category(&self) -> Option<EdgeCategory> {
        if self.is_a(K::ActivityEdge) {
            Some(EdgeCategory::ActivityEdge)
        } else if *self == K::Transition {
            Some(EdgeCategory::Transition)
        } else if *self == K::Connector {
            Some(EdgeCategory::Connector)
        } else if *self == K::Message {
            Some(EdgeCategory::Message)
        } else if self.is_a(K::Relationship) {
            Some(EdgeCategory::Relationship)
        } else {
            None
        }
    }

    /// Metaclass name as it appears in labels and messages.
    pub fn name(&self) -> &'static str {
        match self {
            K::Element => "Element",
            K::NamedElement => "NamedElement",
            K::Namespace => "Namespace",
            K::PackageableElement => "PackageableElement",
            K::Type => "Type",
            K::Classifier => "Classifier",
            K::StructuredClassifier => "StructuredClassifier",
            K::BehavioredClassifier => "BehavioredClassifier",
            K::Behavior => "Behavior",
            K::Feature => "Feature",
            K::StructuralFeature => "StructuralFeature",
            K::Relationship => "Relationship",
            K::DirectedRelationship => "DirectedRelationship",
            K::ActivityNode => "ActivityNode",
            K::ActivityGroup => "ActivityGroup",
            K::ActivityEdge => "ActivityEdge",
            K::Action => "Action",
            K::ControlNode => "ControlNode",
            K::Pin => "Pin",
            K::Vertex => "Vertex",
            K::InteractionFragment => "InteractionFragment",
            K::Model => "Model",
            K::Package => "Package",
            K::Profile => "Profile",
            K::Class => "Class",
            K::Interface => "Interface",
            K::DataType => "DataType",
            K::Enumeration => "Enumeration",
            K::PrimitiveType => "PrimitiveType",
            K::Component => "Component",
            K::Signal => "Signal",
            K::Stereotype => "Stereotype",
            K::Actor => "Actor",
            K::UseCase => "UseCase",
            K::Activity => "Activity",
            K::StateMachine => "StateMachine",
            K::Interaction => "Interaction",
            K::Property => "Property",
            K::Port => "Port",
            K::Operation => "Operation",
            K::EnumerationLiteral => "EnumerationLiteral",
            K::Comment => "Comment",
            K::Constraint => "Constraint",
            K::ActivityPartition => "ActivityPartition",
            K::InterruptibleActivityRegion => "InterruptibleActivityRegion",
            K::OpaqueAction => "OpaqueAction",
            K::CallBehaviorAction => "CallBehaviorAction",
            K::InitialNode => "InitialNode",
            K::ActivityFinalNode => "ActivityFinalNode",
            K::DecisionNode => "DecisionNode",
            K::MergeNode => "MergeNode",
            K::ForkNode => "ForkNode",
            K::JoinNode => "JoinNode",
            K::InputPin => "InputPin",
            K::OutputPin => "OutputPin",
            K::ControlFlow => "ControlFlow",
            K::ObjectFlow => "ObjectFlow",
            K::Region => "Region",
            K::State => "State",
            K::FinalState => "FinalState",
            K::Pseudostate => "Pseudostate",
            K::Transition => "Transition",
            K::Lifeline => "Lifeline",
            K::MessageOccurrenceSpecification => "MessageOccurrenceSpecification",
            K::Message => "Message",
            K::Connector => "Connector",
            K::ConnectorEnd => "ConnectorEnd",
            K::Dependency => "Dependency",
            K::Abstraction => "Abstraction",
            K::Realization => "Realization",
            K::InterfaceRealization => "InterfaceRealization",
            K::Substitution => "Substitution",
            K::Usage => "Usage",
            K::Generalization => "Generalization",
            K::Association => "Association",
            K::Extension => "Extension",
            K::Include => "Include",
            K::Extend => "Extend",
            K::PackageImport => "PackageImport",
            K::PackageMerge => "PackageMerge",
            K::ElementImport => "ElementImport",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// CONTAINMENT RULES
// ============================================================================

/// A containment feature declared by a container metaclass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainmentRule {
    /// Metaclass (or supertype) declaring the feature.
    pub container: ElementKind,
    /// Feature name.
    pub feature: &'static str,
    /// Metaclass (or supertype) of the elements the feature holds.
    pub child: ElementKind,
}

const fn rule(container: ElementKind, feature: &'static str, child: ElementKind) -> ContainmentRule {
    ContainmentRule {
        container,
        feature,
        child,
    }
}

/// Containment features, most specific first.
///
/// The first matching rule gives the default feature used when creating or
/// moving an element without an explicit feature.
pub const CONTAINMENT_RULES: &[ContainmentRule] = &[
    rule(K::Element, "ownedComment", K::Comment),
    rule(K::Namespace, "elementImport", K::ElementImport),
    rule(K::Namespace, "packageImport", K::PackageImport),
    rule(K::Namespace, "ownedRule", K::Constraint),
    rule(K::Package, "packageMerge", K::PackageMerge),
    rule(K::Classifier, "generalization", K::Generalization),
    rule(K::BehavioredClassifier, "interfaceRealization", K::InterfaceRealization),
    rule(K::Classifier, "substitution", K::Substitution),
    rule(K::UseCase, "include", K::Include),
    rule(K::UseCase, "extend", K::Extend),
    rule(K::Activity, "node", K::ActivityNode),
    rule(K::Activity, "edge", K::ActivityEdge),
    rule(K::Activity, "group", K::ActivityGroup),
    rule(K::ActivityPartition, "subpartition", K::ActivityPartition),
    rule(K::Action, "input", K::InputPin),
    rule(K::Action, "output", K::OutputPin),
    rule(K::StateMachine, "region", K::Region),
    rule(K::State, "region", K::Region),
    rule(K::Region, "subvertex", K::Vertex),
    rule(K::Region, "transition", K::Transition),
    rule(K::Interaction, "lifeline", K::Lifeline),
    rule(K::Interaction, "fragment", K::InteractionFragment),
    rule(K::Interaction, "message", K::Message),
    rule(K::StructuredClassifier, "ownedConnector", K::Connector),
    rule(K::Connector, "end", K::ConnectorEnd),
    rule(K::Association, "ownedEnd", K::Property),
    rule(K::Enumeration, "ownedLiteral", K::EnumerationLiteral),
    rule(K::Class, "ownedAttribute", K::Property),
    rule(K::Class, "ownedOperation", K::Operation),
    rule(K::Class, "ownedBehavior", K::Behavior),
    rule(K::Class, "nestedClassifier", K::Classifier),
    rule(K::Interface, "ownedAttribute", K::Property),
    rule(K::Interface, "ownedOperation", K::Operation),
    rule(K::Interface, "nestedClassifier", K::Classifier),
    rule(K::DataType, "ownedAttribute", K::Property),
    rule(K::DataType, "ownedOperation", K::Operation),
    rule(K::BehavioredClassifier, "ownedBehavior", K::Behavior),
    rule(K::Package, "packagedElement", K::PackageableElement),
];

/// The default containment feature of `container` for a `child` element.
pub fn default_containment_feature(
    container: ElementKind,
    child: ElementKind,
) -> Option<&'static str> {
    CONTAINMENT_RULES
        .iter()
        .find(|r| container.is_a(r.container) && child.is_a(r.child))
        .map(|r| r.feature)
}

/// Returns true if `feature` is a containment feature of `container`.
pub fn is_containment_feature(container: ElementKind, feature: &str) -> bool {
    CONTAINMENT_RULES
        .iter()
        .any(|r| r.feature == feature && container.is_a(r.container))
}

/// Returns true if `container` can hold a `child` element in `feature`.
pub fn accepts_in_feature(container: ElementKind, feature: &str, child: ElementKind) -> bool {
    CONTAINMENT_RULES
        .iter()
        .any(|r| r.feature == feature && container.is_a(r.container) && child.is_a(r.child))
}
