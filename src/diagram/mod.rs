//! The graphical side: diagram snapshots and view identity.

pub mod identity;
mod snapshot;
mod view;

pub use snapshot::{Diagram, InvariantViolation};
pub use view::{Edge, Node, ViewKey, ViewParent, ViewRef};
