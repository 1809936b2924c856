//! Shared test helpers.
//!
//! - [`fixtures`]: a class diagram description and a model to display
//! - [`diagram_helpers`]: snapshot lookups and invariant assertions

pub mod fixtures;
