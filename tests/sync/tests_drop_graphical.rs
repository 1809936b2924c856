//! Graphical drop tests: moving nodes and their elements.

use umlsync::diagnostics::codes;
use umlsync::diagram::ViewParent;
use umlsync::semantic::SemanticModel;
use umlsync::sync::{DiagramSyncCoordinator, EditStatus};
use umlsync::SyncError;

use crate::helpers::diagram_helpers::*;
use crate::helpers::fixtures::*;

#[test]
fn test_composite_drop_recreates_subtree_and_moves_element() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "shop", &ViewParent::Diagram);
    let diagram = display(&coordinator, &model, &diagram, "customer", &ViewParent::Diagram);
    let old_customer = node_id_for(&diagram, "customer", "Class_Node");
    let diagram = display(
        &coordinator,
        &model,
        &diagram,
        "customer_name",
        &ViewParent::Node(old_customer.clone()),
    );
    let shop = node_id_for(&diagram, "shop", "Package_Node");
    assert_eq!(diagram.node_count(), 5);

    let outcome = coordinator
        .drop_graphical(&mut model, &diagram, &old_customer, &ViewParent::Node(shop))
        .unwrap();

    assert_eq!(outcome.status, EditStatus::Applied);
    let next = &outcome.diagram;
    assert_consistent(next);
    // Old root deleted, 1 + 2 nodes recreated under the package.
    assert!(next.node(&old_customer).is_none());
    assert_eq!(next.node_count(), 5);
    let customer = node_for(next, "customer", "Class_Node");
    assert_eq!(
        parent_mapping(next, customer).as_deref(),
        Some("Package_PackagedElements_CompartmentNode")
    );
    let property = node_for(next, "customer_name", "Class_Property_Node");
    assert!(next.contains_in_subtree(&customer.id, &property.id));

    // The element moved with its view.
    let moved = model.resolve(&id("customer")).unwrap();
    assert_eq!(moved.owner, Some(id("shop")));
    assert_eq!(moved.containing_feature.as_deref(), Some("packagedElement"));
    assert!(outcome.changes.is_dirty(&id("customer")));
}

#[test]
fn test_drop_on_current_parent_is_a_no_op() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "customer", &ViewParent::Diagram);
    let customer = node_id_for(&diagram, "customer", "Class_Node");

    let outcome = coordinator
        .drop_graphical(&mut model, &diagram, &customer, &ViewParent::Diagram)
        .unwrap();

    assert_eq!(outcome.status, EditStatus::Unchanged);
    assert!(outcome.diagnostics.contains_code(codes::NO_OP));
    assert_eq!(outcome.diagram, diagram);
}

#[test]
fn test_drop_on_node_owning_the_compartment_is_a_no_op() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "customer", &ViewParent::Diagram);
    let customer = node_id_for(&diagram, "customer", "Class_Node");
    let diagram = display(
        &coordinator,
        &model,
        &diagram,
        "customer_name",
        &ViewParent::Node(customer.clone()),
    );
    let property = node_id_for(&diagram, "customer_name", "Class_Property_Node");

    let outcome = coordinator
        .drop_graphical(&mut model, &diagram, &property, &ViewParent::Node(customer))
        .unwrap();

    assert_eq!(outcome.status, EditStatus::Unchanged);
    assert!(outcome.diagnostics.contains_code(codes::NO_OP));
    assert!(!outcome.diagnostics.contains_code(codes::DUPLICATE_VIEW));
    assert_eq!(outcome.diagram, diagram);
    assert!(!model.changes().has_changes());
}

#[test]
fn test_drop_into_read_only_package_changes_nothing() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "library", &ViewParent::Diagram);
    let diagram = display(&coordinator, &model, &diagram, "customer", &ViewParent::Diagram);
    let customer = node_id_for(&diagram, "customer", "Class_Node");
    let library = node_id_for(&diagram, "library", "Package_Node");
    let before = diagram.clone();

    let result = coordinator.drop_graphical(&mut model, &diagram, &customer, &ViewParent::Node(library));

    let Err(error) = result else {
        panic!("Dropping into a read-only package should fail");
    };
    assert!(matches!(error, SyncError::InvalidDrop(_)));
    assert!(error.is_user_facing());
    assert_eq!(diagram, before);
    assert_eq!(model.resolve(&id("customer")).unwrap().owner, Some(id("root")));
    assert!(!model.changes().has_changes());
}

#[test]
fn test_node_cannot_be_dropped_into_itself() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "shop", &ViewParent::Diagram);
    let shop = node_for(&diagram, "shop", "Package_Node");
    let (shop_id, compartment) = (shop.id.clone(), shop.children[0].clone());

    let result = coordinator.drop_graphical(&mut model, &diagram, &shop_id, &ViewParent::Node(compartment));

    assert!(matches!(result, Err(SyncError::InvalidDrop(_))));
}

#[test]
fn test_compartment_cannot_be_moved() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "shop", &ViewParent::Diagram);
    let compartment = node_for(&diagram, "shop", "Package_PackagedElements_CompartmentNode")
        .id
        .clone();

    let result = coordinator.drop_graphical(&mut model, &diagram, &compartment, &ViewParent::Diagram);

    assert!(matches!(result, Err(SyncError::InvalidDrop(_))));
}
