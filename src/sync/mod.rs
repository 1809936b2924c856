//! Diagram synchronization: keeping views and semantic elements in step.
//!
//! ```text
//! coordinator  → DiagramSyncCoordinator, one entry point per gesture
//!   ↓
//! drop         → semantic and graphical drop reconciliation
//! connector    → edge tools applicable between two nodes
//! relationships→ creating and reconnecting relationships
//!   ↓
//! placement    → where a node goes (direct, compartments)
//! endpoints    → source/targets of domain-based edges
//! refresh      → applying requests, recomputing edges
//!   ↓
//! context      → DiagramContext: view requests against a snapshot
//! mapper       → NodeMapper: the most specific node mapping
//! ```

pub mod connector;
pub mod context;
pub mod coordinator;
pub mod drop;
pub mod endpoints;
pub mod mapper;
pub mod placement;
pub mod refresh;
pub mod relationships;

pub use connector::ConnectorToolResolver;
pub use context::{DiagramContext, PendingNode, ViewNode};
pub use coordinator::{DiagramSyncCoordinator, EditOutcome, EditStatus};
pub use drop::{
    DropBehaviorRegistry, DropCategory, DropChecker, DropDecision, DropProvider, DropRequest,
    EditabilityChecker, FeatureSwitchProvider,
};
pub use endpoints::{EdgeEndpointResolver, EndpointFeature};
pub use mapper::{NodeMapper, ResolvedMapping};
pub use placement::{Placed, Placement};
pub use refresh::Refresher;
pub use relationships::EndpointRole;
