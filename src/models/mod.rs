//! # Data Model
//!
//! Canonical types produced by the transformation pipeline. Raw inputs
//! (`task_context`, nodes) stay as borrowed `serde_json::Value` snapshots;
//! everything exported from here is fully typed and validated.

pub mod execution_status;
pub mod status_projection;

pub use execution_status::ExecutionStatus;
pub use status_projection::{ExecutionArtifacts, StatusProjection, TaskTotals};
