//! Deep clone engine for dynamic value graphs.

pub mod engine;

pub use engine::{deep_clone, CloneEngine, UnsupportedPolicy};
