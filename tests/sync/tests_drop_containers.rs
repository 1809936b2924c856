//! Semantic drops into graphical containers that do not own their nodes:
//! activity partitions, interruptible regions, and imported metaclasses.

use umlsync::diagnostics::codes;
use umlsync::diagram::{Diagram, ViewParent};
use umlsync::semantic::SemanticModel;
use umlsync::sync::{DiagramSyncCoordinator, EditStatus};

use crate::helpers::diagram_helpers::*;
use crate::helpers::fixtures::*;

fn open_activity(coordinator: &DiagramSyncCoordinator<'_>, model: &dyn SemanticModel) -> Diagram {
    coordinator.create_diagram(model, &id("activity")).unwrap()
}

// =============================================================================
// ACTIVITY GROUPS
// =============================================================================

#[test]
fn test_flow_endpoints_are_placed_in_their_partition_and_region() {
    let description = activity_diagram();
    let model = activity_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_activity(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "sales", &ViewParent::Diagram);
    let diagram = display(&coordinator, &model, &diagram, "cancel", &ViewParent::Diagram);
    let sales = node_id_for(&diagram, "sales", "Partition_Node");
    let cancel = node_id_for(&diagram, "cancel", "Region_Node");

    let diagram = display(&coordinator, &model, &diagram, "flow", &ViewParent::Diagram);

    let receive = node_for(&diagram, "receive", "Partition_Action_Node");
    assert_eq!(receive.parent, ViewParent::Node(sales));
    let ship = node_for(&diagram, "ship", "Region_Action_Node");
    assert_eq!(ship.parent, ViewParent::Node(cancel));
    assert_eq!(diagram.edge_count(), 1);
    let edge = diagram.edge(&edge_id_for(&diagram, "flow")).unwrap();
    assert_eq!(edge.mapping_id.as_str(), "ControlFlow_Edge");
    assert_eq!(edge.source, receive.id);
    assert_eq!(edge.target, ship.id);
}

#[test]
fn test_interruptible_region_receives_endpoint_without_partition() {
    let description = activity_diagram();
    let model = activity_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_activity(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "cancel", &ViewParent::Diagram);
    let cancel = node_id_for(&diagram, "cancel", "Region_Node");

    let diagram = display(&coordinator, &model, &diagram, "flow", &ViewParent::Diagram);

    assert_eq!(node_for(&diagram, "ship", "Region_Action_Node").parent, ViewParent::Node(cancel));
    // Its partition is not displayed, so the other action sits in the activity.
    assert_eq!(
        node_for(&diagram, "receive", "OpaqueAction_Node").parent,
        ViewParent::Diagram
    );
    assert_eq!(diagram.edges_displaying(&id("flow")).len(), 1);
}

#[test]
fn test_endpoints_fall_back_to_the_activity_when_no_group_is_displayed() {
    let description = activity_diagram();
    let model = activity_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_activity(&coordinator, &model);

    let diagram = display(&coordinator, &model, &diagram, "flow", &ViewParent::Diagram);

    for action in ["receive", "ship"] {
        assert_eq!(node_for(&diagram, action, "OpaqueAction_Node").parent, ViewParent::Diagram);
    }
    assert_eq!(diagram.node_count(), 2);
}

// =============================================================================
// METACLASSES
// =============================================================================

#[test]
fn test_element_import_drop_displays_the_metaclass() {
    let description = class_diagram();
    let model = profile_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);

    let diagram = display(&coordinator, &model, &diagram, "imp", &ViewParent::Diagram);

    let metaclass = node_for(&diagram, "uml_class", "Metaclass_Node");
    assert_eq!(metaclass.parent, ViewParent::Diagram);
    assert_eq!(metaclass.label, "Class");
    assert!(diagram.nodes_displaying(&id("imp")).is_empty());
    assert_eq!(diagram.node_count(), 1);
}

#[test]
fn test_metaclass_endpoint_is_placed_in_the_importing_package() {
    let description = class_diagram();
    let model = profile_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "profile", &ViewParent::Diagram);

    let diagram = display(&coordinator, &model, &diagram, "audited", &ViewParent::Diagram);

    let metaclass = node_for(&diagram, "uml_class", "Metaclass_Node");
    assert_eq!(
        parent_mapping(&diagram, metaclass).as_deref(),
        Some("Package_PackagedElements_CompartmentNode")
    );
    let compartment = diagram.node(metaclass.parent.node_id().unwrap()).unwrap();
    assert_eq!(compartment.target_id, id("profile"));
    assert!(diagram.nodes_displaying(&id("uml")).is_empty());
    let edge = diagram.edge(&edge_id_for(&diagram, "audited")).unwrap();
    assert_eq!(edge.target, metaclass.id);
}

#[test]
fn test_metaclass_endpoint_needs_a_displayed_importer() {
    let description = class_diagram();
    let model = profile_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);

    let outcome = coordinator
        .drop_semantic(&model, &diagram, &id("audited"), &ViewParent::Diagram)
        .unwrap();

    assert_eq!(outcome.status, EditStatus::Failed);
    assert!(outcome.diagnostics.contains_code(codes::UNRESOLVED_ENDPOINT));
    assert_eq!(outcome.diagram, diagram);
}
