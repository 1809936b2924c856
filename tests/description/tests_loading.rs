//! Loading descriptions from files.

use std::io::Write;
use std::path::Path;

use umlsync::SyncError;
use umlsync::description::load_description;

#[cfg(feature = "interchange")]
const CLASS_DIAGRAM: &str = r#"
id: ClassDiagram
name: Class Diagram
domain_type: Package
top_level: [Class_Node]
node_mappings:
  - id: Class_Node
    domain_type: Class
    children: [Class_Attributes_CompartmentNode]
  - id: Class_Attributes_CompartmentNode
    domain_type: Class
    synchronized: true
"#;

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let file = write_temp(".xmi", "<xmi/>");
    let result = load_description(file.path());
    assert!(matches!(result, Err(SyncError::Description(_))));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let result = load_description(Path::new("does/not/exist.yaml"));
    assert!(matches!(result, Err(SyncError::Io(_))));
}

#[cfg(feature = "interchange")]
#[test]
fn test_loaded_description_drives_a_drop() {
    use umlsync::diagram::ViewParent;
    use umlsync::sync::DiagramSyncCoordinator;

    use crate::helpers::fixtures::{class_model, id};

    let file = write_temp(".yaml", CLASS_DIAGRAM);
    let description = load_description(file.path()).unwrap();
    assert_eq!(description.name, "Class Diagram");

    let model = class_model();
    let coordinator = DiagramSyncCoordinator::new(&description);
    let diagram = coordinator.create_diagram(&model, &id("root")).unwrap();
    let outcome = coordinator
        .drop_semantic(&model, &diagram, &id("customer"), &ViewParent::Diagram)
        .unwrap();

    assert!(outcome.is_applied());
    assert_eq!(outcome.diagram.node_count(), 2);
}

#[cfg(not(feature = "interchange"))]
#[test]
fn test_reading_requires_interchange_feature() {
    let file = write_temp(".yaml", "id: ClassDiagram\n");
    let result = load_description(file.path());
    assert!(matches!(result, Err(SyncError::Description(_))));
}
