//! Semantic model: UML metaclasses, elements, and the collaborator trait.
//!
//! The synchronization core reads the model through [`SemanticModel`]; the
//! in-memory [`Model`] is the implementation used by tests and by hosts
//! that do not bring their own store.

mod access;
pub mod editing;
pub mod kind;
pub mod model;

pub use access::SemanticModel;
pub use editing::{Change, ChangeTracker};
pub use kind::{EdgeCategory, ElementKind};
pub use model::{Element, Model};
