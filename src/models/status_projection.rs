//! # Status Projection - Canonical Execution Snapshot
//!
//! **CRITICAL**: This is NOT a persisted record - it's a computed view over
//! the raw `task_context` produced by execution workers.
//!
//! ## Overview
//!
//! The `StatusProjection` represents the canonical, fully validated status
//! of one execution at the moment of the call. It is freshly constructed on
//! every transformation and exclusively owned by the caller on return -
//! never cached or mutated by this crate afterward.
//!
//! It answers the questions a status-query endpoint and dashboard logic
//! need:
//!
//! - **"How is my execution doing?"** (Overall derived status)
//! - **"How much progress has been made?"** (Completion percentage and node counts)
//! - **"What is it working on?"** (Current task, when one is active)
//! - **"What did it produce?"** (Repository path, branch, logs, modified files)
//!
//! ## Guarantees
//!
//! Downstream consumers may assume every projection satisfies the
//! cross-field invariants: an idle execution never names a current task, a
//! running execution always does, a completed execution reports exactly
//! 100.0 progress, and `totals.completed <= totals.total`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::execution_status::ExecutionStatus;

/// Completed/total node counts for one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TaskTotals {
    pub completed: u64,
    pub total: u64,
}

impl TaskTotals {
    /// Build totals enforcing `completed <= total` at construction.
    pub fn clamped(completed: u64, total: u64) -> Self {
        Self {
            completed: completed.min(total),
            total,
        }
    }

    /// Number of nodes not yet completed.
    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.completed)
    }
}

/// Artifacts recorded by workers over the course of an execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExecutionArtifacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub files_modified: Vec<String>,
}

/// Canonical, invariant-satisfying status snapshot for one execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusProjection {
    pub execution_id: String,
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub status: ExecutionStatus,
    /// Completion percentage, always within `[0.0, 100.0]`
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<ExecutionArtifacts>,
    pub totals: TaskTotals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StatusProjection {
    /// Minimal projection substituted when the pipeline fails anywhere.
    ///
    /// Carries the identifiers as given (they may be empty when validation
    /// itself rejected the call) and nothing else: `error` status, zero
    /// progress, no task, no artifacts.
    pub fn fallback(execution_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            execution_id: execution_id.into(),
            project_id: project_id.into(),
            customer_id: None,
            status: ExecutionStatus::Error,
            progress: 0.0,
            current_task: None,
            branch: None,
            artifacts: None,
            totals: TaskTotals::default(),
            started_at: None,
            updated_at: None,
        }
    }

    /// Check if the execution is complete (all nodes finished).
    pub fn is_complete(&self) -> bool {
        self.status == ExecutionStatus::Completed
    }

    /// Check if the execution has failed.
    pub fn has_failed(&self) -> bool {
        self.status.is_error()
    }

    /// Get completion as a float between 0.0 and 1.0.
    pub fn completion_ratio(&self) -> f64 {
        if self.totals.total == 0 {
            0.0
        } else {
            self.totals.completed as f64 / self.totals.total as f64
        }
    }

    /// Get a human-readable status summary.
    pub fn status_summary(&self) -> String {
        match self.status {
            ExecutionStatus::Completed => "Complete".to_string(),
            ExecutionStatus::Error => "Failed".to_string(),
            ExecutionStatus::Running => "Processing".to_string(),
            ExecutionStatus::Initializing => "Preparing".to_string(),
            ExecutionStatus::Idle => "Waiting".to_string(),
        }
    }
}
