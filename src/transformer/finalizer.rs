//! # Finalizer - Invariant Assertion
//!
//! Checks the cross-field invariants against the candidate projection.
//! The deriver already guarantees them at derivation time; a violation
//! here means a pipeline defect and is converted into the fallback
//! projection by the outer boundary.

use crate::error::{Result, TransformationError};
use crate::models::{ExecutionStatus, StatusProjection};

/// Assert every cross-field invariant, reporting all violations at once.
pub fn check_invariants(candidate: &StatusProjection) -> Result<()> {
    let mut violations = Vec::new();

    if candidate.status == ExecutionStatus::Idle && candidate.current_task.is_some() {
        violations.push("idle execution carries a current task".to_string());
    }
    if candidate.status == ExecutionStatus::Running && candidate.current_task.is_none() {
        violations.push("running execution is missing a current task".to_string());
    }
    if candidate.status == ExecutionStatus::Completed && candidate.progress != 100.0 {
        violations.push(format!(
            "completed execution reports progress {}",
            candidate.progress
        ));
    }
    if !candidate.progress.is_finite() || !(0.0..=100.0).contains(&candidate.progress) {
        violations.push(format!("progress {} outside [0, 100]", candidate.progress));
    }
    if candidate.totals.completed > candidate.totals.total {
        violations.push(format!(
            "completed count {} exceeds total {}",
            candidate.totals.completed, candidate.totals.total
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(TransformationError::InvariantViolation { violations })
    }
}
