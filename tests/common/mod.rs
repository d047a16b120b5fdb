#![allow(dead_code)] // Each test binary uses its own subset of these helpers

pub mod strategies;

pub use strategies::*;

use serde_json::{json, Value};

/// Build a task context from metadata and nodes values.
pub fn context(metadata: Value, nodes: Value) -> Value {
    json!({"metadata": metadata, "nodes": nodes})
}

/// Modern node shape with a direct status field.
pub fn node(status: &str) -> Value {
    json!({"status": status})
}

/// Legacy node shape with the status nested under event_data.
pub fn legacy_node(status: &str) -> Value {
    json!({"event_data": {"status": status}})
}
