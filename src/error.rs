//! # Structured Error Handling
//!
//! Error taxonomy for the status projection pipeline. Every member is
//! internal: the outer boundary in [`crate::transformer::StatusTransformer`]
//! absorbs all of them and substitutes a fallback projection, so none of
//! these surface to callers of the public entry point.

use thiserror::Error;

/// Errors raised by the transformation pipeline phases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformationError {
    /// The call arguments themselves are malformed: an empty identifier or
    /// a `task_context` that is not a mapping.
    #[error("invalid task context: {0}")]
    InvalidTaskContext(String),

    /// Reserved for future schema versions where a field becomes
    /// structurally mandatory. Under the current schema every extraction
    /// gap degrades instead of failing.
    #[error("field extraction failed for '{field}': {reason}")]
    FieldExtraction { field: String, reason: String },

    /// Reserved for structurally impossible input, such as a node
    /// collection that cannot be iterated at all after extraction
    /// defaulting. Everything else degrades gracefully.
    #[error("status calculation failed: {0}")]
    StatusCalculation(String),

    /// The candidate projection failed the cross-field invariant check.
    #[error("projection violates invariants: {}", .violations.join("; "))]
    InvariantViolation { violations: Vec<String> },
}

pub type Result<T> = std::result::Result<T, TransformationError>;
