//! Deletion and refresh tests.

use umlsync::diagram::{ViewParent, ViewRef};
use umlsync::semantic::SemanticModel;
use umlsync::sync::{DiagramSyncCoordinator, EditStatus};
use umlsync::{SyncError, SyncOptions};

use crate::helpers::diagram_helpers::*;
use crate::helpers::fixtures::*;

// =============================================================================
// DELETION
// =============================================================================

#[test]
fn test_delete_semantic_removes_element_views_and_edges() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "uses", &ViewParent::Diagram);
    let order = node_id_for(&diagram, "order", "Class_Node");

    let outcome = coordinator
        .delete_semantic(&mut model, &diagram, &ViewRef::Node(order))
        .unwrap();

    assert_eq!(outcome.status, EditStatus::Applied);
    assert_consistent(&outcome.diagram);
    assert!(model.resolve(&id("order")).is_none());
    assert!(outcome.changes.is_removed(&id("order")));
    // The dependency lost its supplier.
    assert!(outcome.changes.is_dirty(&id("uses")));
    assert!(outcome.diagram.nodes_displaying(&id("order")).is_empty());
    assert_eq!(outcome.diagram.edge_count(), 0);
    assert_eq!(outcome.diagram.node_count(), 2);
}

#[test]
fn test_delete_semantic_on_edge_keeps_endpoints() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "uses", &ViewParent::Diagram);
    let edge = edge_id_for(&diagram, "uses");

    let outcome = coordinator
        .delete_semantic(&mut model, &diagram, &ViewRef::Edge(edge))
        .unwrap();

    assert!(outcome.is_applied());
    assert!(model.resolve(&id("uses")).is_none());
    assert_eq!(outcome.diagram.edge_count(), 0);
    assert_eq!(outcome.diagram.node_count(), 4);
}

#[test]
fn test_delete_view_keeps_the_model() {
    let description = class_diagram();
    let model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "uses", &ViewParent::Diagram);
    let customer = node_id_for(&diagram, "customer", "Class_Node");
    let count = model.element_count();

    let outcome = coordinator.delete_view(&model, &diagram, &customer).unwrap();

    assert_eq!(outcome.status, EditStatus::Applied);
    assert_consistent(&outcome.diagram);
    assert_eq!(model.element_count(), count);
    assert!(!outcome.changes.has_changes());
    // The edge lost its source view; only the order node and its compartment remain.
    assert_eq!(outcome.diagram.edge_count(), 0);
    assert_eq!(outcome.diagram.node_count(), 2);
}

#[test]
fn test_read_only_element_cannot_be_deleted() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "library", &ViewParent::Diagram);
    let library = node_id_for(&diagram, "library", "Package_Node");

    let result = coordinator.delete_semantic(&mut model, &diagram, &ViewRef::Node(library));

    assert!(matches!(result, Err(SyncError::NotEditable(_))));
    assert!(model.resolve(&id("library")).is_some());
}

// =============================================================================
// REFRESH
// =============================================================================

#[test]
fn test_refresh_prunes_views_of_deleted_elements() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "customer", &ViewParent::Diagram);
    let diagram = display(&coordinator, &model, &diagram, "order", &ViewParent::Diagram);

    model.delete_element(&id("customer")).unwrap();
    let outcome = coordinator.refresh(&model, &diagram);

    assert_eq!(outcome.status, EditStatus::Applied);
    assert_consistent(&outcome.diagram);
    assert!(outcome.diagram.nodes_displaying(&id("customer")).is_empty());
    assert_eq!(outcome.diagram.node_count(), 2);
    assert_eq!(outcome.diagram.edge_count(), 0);
}

#[test]
fn test_refresh_without_model_change_is_unchanged() {
    let description = class_diagram();
    let model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "uses", &ViewParent::Diagram);

    let outcome = coordinator.refresh(&model, &diagram);

    assert_eq!(outcome.status, EditStatus::Unchanged);
    assert_eq!(outcome.diagram, diagram);
}

#[test]
fn test_refresh_synchronizes_labels() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "customer", &ViewParent::Diagram);

    model.get_mut(&id("customer")).unwrap().name = Some("Client".into());
    let outcome = coordinator.refresh(&model, &diagram);

    assert_eq!(outcome.status, EditStatus::Applied);
    assert_eq!(node_for(&outcome.diagram, "customer", "Class_Node").label, "Client");
}

#[test]
fn test_labels_are_kept_when_synchronization_is_off() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description)
        .with_options(SyncOptions::default().with_label_synchronization(false));
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "customer", &ViewParent::Diagram);

    model.get_mut(&id("customer")).unwrap().name = Some("Client".into());
    let outcome = coordinator.refresh(&model, &diagram);

    assert_eq!(outcome.status, EditStatus::Unchanged);
    assert_eq!(node_for(&outcome.diagram, "customer", "Class_Node").label, "Customer");
}
