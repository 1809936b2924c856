//! Class diagram fixtures.
//!
//! ```text
//! root (Model)
//! ├── shop (Package)
//! │   └── cart (Class)
//! ├── customer (Class)
//! │   └── customer_name (Property)
//! ├── order (Class)
//! ├── billable (Interface)
//! ├── status (Enumeration)
//! ├── uses (Dependency: customer → order)
//! ├── hidden (Package)
//! │   └── archived (Class)
//! ├── archives (Dependency: customer → archived)
//! └── library (Package, read-only)
//! ```
//!
//! [`profile_model`] adds a metaclass library and a profile importing it;
//! [`activity_model`] is a separate activity with a partition and an
//! interruptible region.

use umlsync::ElementId;
use umlsync::description::{
    DiagramDescription, EdgeCandidate, EdgeMapping, EdgeTool, NodeMapping, NodeTool,
    PaletteSection,
};
use umlsync::semantic::{Element, ElementKind, Model};

pub fn id(s: &str) -> ElementId {
    ElementId::from(s)
}

/// A class diagram opened on packages.
///
/// `Classifier_Node` is declared first so that specificity, not
/// declaration order, decides which mapping displays a class.
pub fn class_diagram() -> DiagramDescription {
    DiagramDescription::new("ClassDiagram", ElementKind::Package)
        .with_name("Class Diagram")
        .with_top_level(NodeMapping::new("Classifier_Node", ElementKind::Classifier))
        .with_top_level(
            NodeMapping::new("Package_Node", ElementKind::Package)
                .with_child("Package_PackagedElements_CompartmentNode"),
        )
        .with_top_level(
            NodeMapping::new("Class_Node", ElementKind::Class)
                .with_child("Class_Attributes_CompartmentNode"),
        )
        .with_top_level(NodeMapping::new("Interface_Node", ElementKind::Interface))
        .with_top_level(NodeMapping::new("Metaclass_Node", ElementKind::Class).metaclass())
        .with_node_mapping(
            NodeMapping::new("Package_PackagedElements_CompartmentNode", ElementKind::Package)
                .synchronized()
                .reusing("Class_Node")
                .reusing("Interface_Node")
                .reusing("Package_Node")
                .reusing("Metaclass_Node"),
        )
        .with_node_mapping(
            NodeMapping::new("Class_Attributes_CompartmentNode", ElementKind::Class)
                .synchronized()
                .with_child("Class_Property_Node"),
        )
        .with_node_mapping(NodeMapping::new("Class_Property_Node", ElementKind::Property))
        .with_edge_mapping(EdgeMapping::new("Dependency_Edge", ElementKind::Dependency))
        .with_edge_mapping(
            EdgeMapping::new("Generalization_Edge", ElementKind::Generalization)
                .with_source("Class_Node")
                .with_source("Interface_Node")
                .with_target("Class_Node")
                .with_target("Interface_Node"),
        )
        .with_section(
            PaletteSection::new("Nodes")
                .with_node_tool(
                    NodeTool::new("CreateClass", ElementKind::Class)
                        .on_diagram()
                        .on("Package_Node")
                        .on("Package_PackagedElements_CompartmentNode"),
                )
                .with_node_tool(
                    NodeTool::new("CreateProperty", ElementKind::Property)
                        .on("Class_Node")
                        .on("Class_Attributes_CompartmentNode"),
                ),
        )
        .with_section(
            PaletteSection::new("Edges")
                .with_edge_tool(
                    EdgeTool::new("CreateDependency", ElementKind::Dependency, "Dependency_Edge")
                        .with_candidate(EdgeCandidate::new(
                            ["Class_Node", "Interface_Node"],
                            ["Class_Node", "Interface_Node"],
                        )),
                )
                .with_edge_tool(
                    EdgeTool::new(
                        "CreateGeneralization",
                        ElementKind::Generalization,
                        "Generalization_Edge",
                    )
                    .with_candidate(EdgeCandidate::new(["Class_Node"], ["Class_Node"]))
                    .with_candidate(EdgeCandidate::new(["Interface_Node"], ["Interface_Node"])),
                ),
        )
}

/// The model shown in the module docs.
pub fn class_model() -> Model {
    let mut model = Model::new();
    let root = model.add_root(Element::new("root", ElementKind::Model).with_name("Root"));
    let owned = |model: &mut Model, owner: &ElementId, element: Element| {
        model.add_owned(owner, element).unwrap()
    };

    let shop = owned(&mut model, &root, Element::new("shop", ElementKind::Package).with_name("Shop"));
    owned(&mut model, &shop, Element::new("cart", ElementKind::Class).with_name("Cart"));

    let customer = owned(
        &mut model,
        &root,
        Element::new("customer", ElementKind::Class).with_name("Customer"),
    );
    owned(
        &mut model,
        &customer,
        Element::new("customer_name", ElementKind::Property).with_name("name"),
    );
    owned(&mut model, &root, Element::new("order", ElementKind::Class).with_name("Order"));
    owned(
        &mut model,
        &root,
        Element::new("billable", ElementKind::Interface).with_name("Billable"),
    );
    owned(
        &mut model,
        &root,
        Element::new("status", ElementKind::Enumeration).with_name("Status"),
    );
    owned(
        &mut model,
        &root,
        Element::new("uses", ElementKind::Dependency)
            .with_name("uses")
            .with_reference("client", "customer")
            .with_reference("supplier", "order"),
    );

    let hidden = owned(
        &mut model,
        &root,
        Element::new("hidden", ElementKind::Package).with_name("Hidden"),
    );
    owned(
        &mut model,
        &hidden,
        Element::new("archived", ElementKind::Class).with_name("Archived"),
    );
    owned(
        &mut model,
        &root,
        Element::new("archives", ElementKind::Dependency)
            .with_reference("client", "customer")
            .with_reference("supplier", "archived"),
    );

    owned(
        &mut model,
        &root,
        Element::new("library", ElementKind::Package)
            .with_name("Library")
            .as_read_only(),
    );
    model
}

/// The class model plus a read-only metaclass library and a profile.
///
/// ```text
/// uml (Package, read-only)
/// └── uml_class (Class, metaclass)
/// profile (Package)
/// └── imp (ElementImport → uml_class)
/// audited (Dependency: customer → uml_class)
/// ```
pub fn profile_model() -> Model {
    let mut model = class_model();
    let root = id("root");
    let uml = model
        .add_owned(
            &root,
            Element::new("uml", ElementKind::Package)
                .with_name("UML")
                .as_read_only(),
        )
        .unwrap();
    model
        .add_owned(
            &uml,
            Element::new("uml_class", ElementKind::Class)
                .with_name("Class")
                .as_metaclass(),
        )
        .unwrap();

    let profile = model
        .add_owned(&root, Element::new("profile", ElementKind::Package).with_name("Profile"))
        .unwrap();
    model
        .add_owned(
            &profile,
            Element::new("imp", ElementKind::ElementImport)
                .with_reference("importedElement", "uml_class"),
        )
        .unwrap();
    model
        .add_owned(
            &root,
            Element::new("audited", ElementKind::Dependency)
                .with_name("audited")
                .with_reference("client", "customer")
                .with_reference("supplier", "uml_class"),
        )
        .unwrap();
    model
}

/// An activity diagram where actions can sit in partitions and
/// interruptible regions.
pub fn activity_diagram() -> DiagramDescription {
    DiagramDescription::new("ActivityDiagram", ElementKind::Activity)
        .with_name("Activity Diagram")
        .with_top_level(NodeMapping::new("OpaqueAction_Node", ElementKind::OpaqueAction))
        .with_top_level(
            NodeMapping::new("Partition_Node", ElementKind::ActivityPartition)
                .with_child("Partition_Action_Node"),
        )
        .with_top_level(
            NodeMapping::new("Region_Node", ElementKind::InterruptibleActivityRegion)
                .with_child("Region_Action_Node"),
        )
        .with_node_mapping(NodeMapping::new("Partition_Action_Node", ElementKind::OpaqueAction))
        .with_node_mapping(NodeMapping::new("Region_Action_Node", ElementKind::OpaqueAction))
        .with_edge_mapping(EdgeMapping::new("ControlFlow_Edge", ElementKind::ControlFlow))
}

/// ```text
/// activity (Activity)
/// ├── receive (OpaqueAction, in sales)
/// ├── ship (OpaqueAction, in cancel)
/// ├── sales (ActivityPartition)
/// ├── cancel (InterruptibleActivityRegion)
/// └── flow (ControlFlow: receive → ship)
/// ```
pub fn activity_model() -> Model {
    let mut model = Model::new();
    let root = model.add_root(Element::new("root", ElementKind::Model));
    let activity = model
        .add_owned(&root, Element::new("activity", ElementKind::Activity).with_name("Order"))
        .unwrap();
    for element in [
        Element::new("receive", ElementKind::OpaqueAction)
            .with_name("Receive")
            .with_reference("inPartition", "sales"),
        Element::new("ship", ElementKind::OpaqueAction)
            .with_name("Ship")
            .with_reference("inInterruptibleRegion", "cancel"),
        Element::new("sales", ElementKind::ActivityPartition).with_name("Sales"),
        Element::new("cancel", ElementKind::InterruptibleActivityRegion).with_name("Cancel"),
        Element::new("flow", ElementKind::ControlFlow)
            .with_reference("source", "receive")
            .with_reference("target", "ship"),
    ] {
        model.add_owned(&activity, element).unwrap();
    }
    model
}
