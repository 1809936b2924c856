//! Synchronization tests
//!
//! Tests for the coordinator operations on a class diagram:
//! - Semantic drops and endpoint materialization
//! - Drops into partitions, regions, and importing packages
//! - Graphical drops
//! - Palette tools and reconnection
//! - Deletion and refresh

pub mod tests_deletion;
pub mod tests_drop_containers;
pub mod tests_drop_graphical;
pub mod tests_tools;
