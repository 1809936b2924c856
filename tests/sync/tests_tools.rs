//! Palette tool tests: node creation, edge creation, connector tools and
//! reconnection.

use umlsync::diagnostics::codes;
use umlsync::diagram::ViewParent;
use umlsync::semantic::{ElementKind, SemanticModel};
use umlsync::sync::{DiagramSyncCoordinator, EditStatus, EndpointRole};
use umlsync::{SyncError, ToolId};

use crate::helpers::diagram_helpers::*;
use crate::helpers::fixtures::*;

// =============================================================================
// CONNECTOR TOOLS
// =============================================================================

#[test]
fn test_connector_tools_between_classes() {
    let description = class_diagram();
    let model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "customer", &ViewParent::Diagram);
    let diagram = display(&coordinator, &model, &diagram, "order", &ViewParent::Diagram);

    let (tools, diagnostics) = coordinator
        .connector_tools(
            &model,
            &diagram,
            &node_id_for(&diagram, "customer", "Class_Node"),
            &node_id_for(&diagram, "order", "Class_Node"),
        )
        .unwrap()
        .into_parts();

    let ids: Vec<&str> = tools.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["CreateDependency", "CreateGeneralization"]);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_connector_tools_for_undeclared_pair_is_empty() {
    let description = class_diagram();
    let model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "shop", &ViewParent::Diagram);
    let diagram = display(&coordinator, &model, &diagram, "customer", &ViewParent::Diagram);

    let (tools, diagnostics) = coordinator
        .connector_tools(
            &model,
            &diagram,
            &node_id_for(&diagram, "shop", "Package_Node"),
            &node_id_for(&diagram, "customer", "Class_Node"),
        )
        .unwrap()
        .into_parts();

    assert!(tools.is_empty());
    assert!(diagnostics.contains_code(codes::NO_CONNECTOR_TOOL));
    let warning = diagnostics.iter().next().unwrap();
    assert!(warning.message.contains("Package"));
    assert!(warning.message.contains("Class"));
}

// =============================================================================
// NODE TOOLS
// =============================================================================

#[test]
fn test_create_node_in_package() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "shop", &ViewParent::Diagram);
    let shop = node_id_for(&diagram, "shop", "Package_Node");

    let outcome = coordinator
        .create_node(&mut model, &diagram, &ViewParent::Node(shop), &ToolId::from("CreateClass"))
        .unwrap();

    assert_eq!(outcome.status, EditStatus::Applied);
    assert_consistent(&outcome.diagram);
    let created = outcome.changes.created_elements();
    assert_eq!(created.len(), 1);
    let class = model.resolve(created[0]).unwrap();
    assert_eq!(class.kind, ElementKind::Class);
    assert_eq!(class.owner, Some(id("shop")));

    let node = node_for(&outcome.diagram, class.id.as_str(), "Class_Node");
    assert_eq!(
        parent_mapping(&outcome.diagram, node).as_deref(),
        Some("Package_PackagedElements_CompartmentNode")
    );
}

#[test]
fn test_create_property_in_class_compartment() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "order", &ViewParent::Diagram);
    let order = node_id_for(&diagram, "order", "Class_Node");

    let outcome = coordinator
        .create_node(&mut model, &diagram, &ViewParent::Node(order), &ToolId::from("CreateProperty"))
        .unwrap();

    assert!(outcome.is_applied());
    let attributes = model.resolve(&id("order")).unwrap().owned("ownedAttribute").to_vec();
    assert_eq!(attributes.len(), 1);
    let node = node_for(&outcome.diagram, attributes[0].as_str(), "Class_Property_Node");
    assert_eq!(
        parent_mapping(&outcome.diagram, node).as_deref(),
        Some("Class_Attributes_CompartmentNode")
    );
}

#[test]
fn test_tool_not_offered_on_target_changes_nothing() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let count = model.element_count();

    let outcome = coordinator
        .create_node(&mut model, &diagram, &ViewParent::Diagram, &ToolId::from("CreateProperty"))
        .unwrap();

    assert_eq!(outcome.status, EditStatus::Failed);
    assert!(outcome.diagnostics.contains_code(codes::TOOL_NOT_APPLICABLE));
    assert_eq!(model.element_count(), count);
}

#[test]
fn test_unknown_tool_is_an_error() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);

    let result =
        coordinator.create_node(&mut model, &diagram, &ViewParent::Diagram, &ToolId::from("Nope"));
    assert!(matches!(result, Err(SyncError::UnknownTool(_))));
}

// =============================================================================
// EDGE TOOLS
// =============================================================================

#[test]
fn test_create_generalization_between_classes() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "customer", &ViewParent::Diagram);
    let diagram = display(&coordinator, &model, &diagram, "order", &ViewParent::Diagram);
    let customer = node_id_for(&diagram, "customer", "Class_Node");
    let order = node_id_for(&diagram, "order", "Class_Node");

    let outcome = coordinator
        .create_edge(
            &mut model,
            &diagram,
            &customer,
            &order,
            &ToolId::from("CreateGeneralization"),
        )
        .unwrap();

    assert_eq!(outcome.status, EditStatus::Applied);
    assert_consistent(&outcome.diagram);
    let generalizations = model.resolve(&id("customer")).unwrap().owned("generalization").to_vec();
    assert_eq!(generalizations.len(), 1);
    let generalization = model.resolve(&generalizations[0]).unwrap();
    assert_eq!(generalization.first_referenced("general"), Some(&id("order")));

    let edges = outcome.diagram.edges_displaying(&generalization.id);
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].mapping_id.as_str(), "Generalization_Edge");
    assert_eq!(edges[0].source, customer);
    assert_eq!(edges[0].target, order);
    // The existing dependency is still displayed.
    assert_eq!(outcome.diagram.edge_count(), 2);
}

#[test]
fn test_edge_tool_rejects_undeclared_pair() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "customer", &ViewParent::Diagram);
    let diagram = display(&coordinator, &model, &diagram, "billable", &ViewParent::Diagram);
    let count = model.element_count();

    let outcome = coordinator
        .create_edge(
            &mut model,
            &diagram,
            &node_id_for(&diagram, "customer", "Class_Node"),
            &node_id_for(&diagram, "billable", "Interface_Node"),
            &ToolId::from("CreateGeneralization"),
        )
        .unwrap();

    assert_eq!(outcome.status, EditStatus::Failed);
    assert!(outcome.diagnostics.contains_code(codes::TOOL_NOT_APPLICABLE));
    assert_eq!(model.element_count(), count);
}

// =============================================================================
// RECONNECTION
// =============================================================================

#[test]
fn test_reconnect_dependency_target() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "uses", &ViewParent::Diagram);
    let diagram = display(&coordinator, &model, &diagram, "billable", &ViewParent::Diagram);
    let billable = node_id_for(&diagram, "billable", "Interface_Node");
    let edge = edge_id_for(&diagram, "uses");

    let outcome = coordinator
        .reconnect(&mut model, &diagram, &edge, EndpointRole::Target, &billable)
        .unwrap();

    assert_eq!(outcome.status, EditStatus::Applied);
    assert_consistent(&outcome.diagram);
    assert_eq!(
        model.resolve(&id("uses")).unwrap().referenced("supplier"),
        &[id("billable")]
    );
    let edges = outcome.diagram.edges_displaying(&id("uses"));
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].target, billable);
}

#[test]
fn test_reconnect_to_unaccepted_mapping_is_rejected() {
    let description = class_diagram();
    let mut model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = open_diagram(&coordinator, &model);
    let diagram = display(&coordinator, &model, &diagram, "customer", &ViewParent::Diagram);
    let diagram = display(&coordinator, &model, &diagram, "order", &ViewParent::Diagram);
    let diagram = display(&coordinator, &model, &diagram, "shop", &ViewParent::Diagram);
    let outcome = coordinator
        .create_edge(
            &mut model,
            &diagram,
            &node_id_for(&diagram, "customer", "Class_Node"),
            &node_id_for(&diagram, "order", "Class_Node"),
            &ToolId::from("CreateGeneralization"),
        )
        .unwrap();
    let diagram = outcome.diagram;
    let edge = diagram
        .edges()
        .find(|e| e.mapping_id.as_str() == "Generalization_Edge")
        .map(|e| e.id.clone())
        .unwrap();

    let result = coordinator.reconnect(
        &mut model,
        &diagram,
        &edge,
        EndpointRole::Target,
        &node_id_for(&diagram, "shop", "Package_Node"),
    );

    assert!(matches!(result, Err(SyncError::InvalidReconnection(_))));
}
