//! Description loading tests.

pub mod tests_loading;
