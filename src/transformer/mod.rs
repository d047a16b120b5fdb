//! # Transformation Pipeline
//!
//! Converts an arbitrary, possibly malformed `task_context` into a
//! canonical [`StatusProjection`]. Five phases applied in strict sequence
//! per call, no shared mutable state between calls:
//!
//! 1. [`validator`] - checks the minimal shape of the call
//! 2. [`extractor`] - pulls sub-mappings out of the context, tolerating
//!    wrong types by substituting empty defaults
//! 3. [`status_deriver`] - single pass over all nodes; derives the overall
//!    status, progress, and customer
//! 4. [`composer`] - assembles artifacts, totals, and timestamps into a
//!    candidate projection
//! 5. [`finalizer`] - asserts cross-field invariants
//!
//! The whole pipeline is wrapped by a single outer boundary in
//! [`StatusTransformer::transform`]: any phase error is caught exactly
//! once and converted into a minimal error-status projection, so the call
//! never fails to produce a usable answer. True failures are visible only
//! through logs and metrics - a deliberate availability-over-transparency
//! trade-off.
//!
//! Anomalies the pipeline can absorb are modeled as [`Degradation`]
//! notices returned alongside phase values rather than thrown errors; the
//! error taxonomy in [`crate::error`] is reserved for the outer boundary.

pub mod composer;
pub mod extractor;
pub mod finalizer;
pub mod status_deriver;
pub mod validator;

use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::models::StatusProjection;
use crate::telemetry::{CallOutcome, Telemetry};

/// A non-fatal anomaly absorbed with a default substitution and a logged
/// notice, rather than a thrown error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Degradation {
    /// Pipeline component that absorbed the anomaly
    pub component: &'static str,
    pub message: String,
}

impl Degradation {
    pub fn new(component: &'static str, message: impl Into<String>) -> Self {
        Self {
            component,
            message: message.into(),
        }
    }
}

/// One transform call's arguments, for the batch entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformRequest {
    pub execution_id: String,
    pub project_id: String,
    pub task_context: Value,
}

/// StatusTransformer converts raw task contexts into status projections.
///
/// The transformer is stateless across invocations and safe to share
/// across threads; its only collaborator is the injected [`Telemetry`]
/// handle.
#[derive(Debug, Clone)]
pub struct StatusTransformer {
    telemetry: Telemetry,
}

impl StatusTransformer {
    /// Create a new StatusTransformer with the given telemetry handle
    pub fn new(telemetry: Telemetry) -> Self {
        Self { telemetry }
    }

    /// The telemetry handle this transformer records into
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Transform one task context into a status projection.
    ///
    /// Total under any input: every internal error is absorbed at this
    /// boundary and converted into the minimal fallback projection. Each
    /// call emits one structured log record and one duration sample,
    /// success or fallback alike.
    pub fn transform(
        &self,
        execution_id: &str,
        project_id: &str,
        task_context: &Value,
    ) -> StatusProjection {
        let started = Instant::now();
        let mut notices = Vec::new();
        let result = run_pipeline(execution_id, project_id, task_context, &mut notices);
        let duration = started.elapsed();

        for notice in &notices {
            tracing::warn!(
                execution_id,
                project_id,
                component = notice.component,
                "degraded operation: {}",
                notice.message
            );
        }

        match result {
            Ok(projection) => {
                let outcome = if notices.is_empty() {
                    CallOutcome::Success
                } else {
                    CallOutcome::Degraded
                };
                self.telemetry.record(outcome, duration);
                tracing::info!(
                    execution_id,
                    project_id,
                    status = %projection.status,
                    completed = projection.totals.completed,
                    total = projection.totals.total,
                    duration_ms = duration.as_millis() as u64,
                    outcome = %outcome,
                    "status projection"
                );
                projection
            }
            Err(err) => {
                self.telemetry.record(CallOutcome::Fallback, duration);
                let fallback = StatusProjection::fallback(execution_id, project_id);
                tracing::error!(
                    execution_id,
                    project_id,
                    status = %fallback.status,
                    completed = fallback.totals.completed,
                    total = fallback.totals.total,
                    duration_ms = duration.as_millis() as u64,
                    outcome = %CallOutcome::Fallback,
                    error = %err,
                    "status projection fell back"
                );
                fallback
            }
        }
    }

    /// Transform a batch of task contexts, one projection per request.
    ///
    /// Convenience fan-out over the single-call path for dashboard-style
    /// bulk queries; ordering matches the input.
    pub fn transform_batch(&self, requests: &[TransformRequest]) -> Vec<StatusProjection> {
        requests
            .iter()
            .map(|request| {
                self.transform(
                    &request.execution_id,
                    &request.project_id,
                    &request.task_context,
                )
            })
            .collect()
    }
}

impl Default for StatusTransformer {
    fn default() -> Self {
        Self::new(Telemetry::default())
    }
}

/// The five phases in strict sequence. Errors propagate to the boundary
/// in [`StatusTransformer::transform`]; absorbed anomalies accumulate in
/// `notices`.
fn run_pipeline(
    execution_id: &str,
    project_id: &str,
    task_context: &Value,
    notices: &mut Vec<Degradation>,
) -> Result<StatusProjection> {
    let ctx = validator::validate(execution_id, project_id, task_context)?;

    let metadata = extractor::section(ctx, "metadata", notices);
    let nodes = extractor::section(ctx, "nodes", notices);

    let tally = status_deriver::tally_nodes(nodes, notices);
    let status = status_deriver::derive_status(&tally, metadata, notices);
    let progress = status_deriver::progress(&tally, notices);
    let current_task = status_deriver::current_task(status, metadata, &tally, notices);

    let candidate = composer::compose(
        execution_id,
        project_id,
        metadata,
        status,
        progress,
        current_task,
        &tally,
        notices,
    );

    finalizer::check_invariants(&candidate)?;
    Ok(candidate)
}
