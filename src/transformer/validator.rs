//! # Validator - Call Shape Checks
//!
//! Minimal validation of the transform call itself: identifiers must be
//! non-empty and `task_context` must be a mapping. Everything past this
//! gate degrades instead of failing.

use serde_json::{Map, Value};

use crate::error::{Result, TransformationError};

use super::extractor::value_kind;

/// Validate the call arguments and expose the context mapping.
pub fn validate<'a>(
    execution_id: &str,
    project_id: &str,
    task_context: &'a Value,
) -> Result<&'a Map<String, Value>> {
    tracing::debug!(execution_id, project_id, "validating transform call");

    if execution_id.is_empty() {
        return Err(TransformationError::InvalidTaskContext(
            "execution_id must be a non-empty string".to_string(),
        ));
    }
    if project_id.is_empty() {
        return Err(TransformationError::InvalidTaskContext(
            "project_id must be a non-empty string".to_string(),
        ));
    }
    let Value::Object(ctx) = task_context else {
        return Err(TransformationError::InvalidTaskContext(format!(
            "task_context must be an object, got {}",
            value_kind(task_context)
        )));
    };

    tracing::debug!(execution_id, project_id, "transform call validated");
    Ok(ctx)
}
