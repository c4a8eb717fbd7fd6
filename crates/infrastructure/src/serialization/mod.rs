//! Deterministic JSON serialization for persisted objects.
//!
//! Output uses 2-space indentation and ends with a newline, so two writes
//! of the same value produce identical files.

mod json;

pub use json::*;
