//! BlockCanvas CLI
//!
//! Loads documents through the editing engine and reports on them.

pub mod components;
pub mod report;
pub mod shortcuts;

pub use components::{builtin_registry, measure};
pub use report::{layout, outline};
