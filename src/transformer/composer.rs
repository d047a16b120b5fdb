//! # Composer - Candidate Projection Assembly
//!
//! Assembles artifacts, totals, and timestamps into a candidate
//! [`StatusProjection`]. Sub-object shape violations substitute defaults
//! with a degraded-operation notice; the candidate is not yet checked
//! against the cross-field invariants.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::models::{ExecutionArtifacts, ExecutionStatus, StatusProjection, TaskTotals};

use super::extractor::{
    self, value_kind, BRANCH_KEYS, FILES_MODIFIED_KEYS, LOGS_KEYS, REPO_PATH_KEYS,
    STARTED_AT_KEYS, UPDATED_AT_KEYS,
};
use super::status_deriver::{self, NodeTally};
use super::Degradation;

/// Build execution artifacts from metadata fallback fields.
pub fn build_artifacts(
    metadata: &Map<String, Value>,
    notices: &mut Vec<Degradation>,
) -> ExecutionArtifacts {
    ExecutionArtifacts {
        repo_path: extractor::resolve_string(metadata, REPO_PATH_KEYS, "repo_path", notices),
        branch: extractor::resolve_string(metadata, BRANCH_KEYS, "branch", notices),
        logs: extractor::resolve_string_seq(metadata, LOGS_KEYS, "logs", notices),
        files_modified: extractor::resolve_string_seq(
            metadata,
            FILES_MODIFIED_KEYS,
            "files_modified",
            notices,
        ),
    }
}

/// Build totals from the deriver's counts, clamping defensively.
pub fn build_totals(tally: &NodeTally, notices: &mut Vec<Degradation>) -> TaskTotals {
    if tally.completed > tally.total {
        notices.push(Degradation::new(
            "composer",
            format!(
                "completed count {} exceeds total {}; clamping",
                tally.completed, tally.total
            ),
        ));
    }
    TaskTotals::clamped(tally.completed, tally.total)
}

/// Parse an ISO-8601 timestamp from metadata fallback fields.
/// A missing field is absent silently; an unparseable or non-string value
/// is absent with a notice.
pub fn parse_timestamp(
    metadata: &Map<String, Value>,
    candidates: &[&str],
    field: &str,
    notices: &mut Vec<Degradation>,
) -> Option<DateTime<Utc>> {
    match extractor::resolve_field(metadata, candidates)? {
        Value::String(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(err) => {
                notices.push(Degradation::new(
                    "composer",
                    format!("unparseable {field} '{raw}': {err}"),
                ));
                None
            }
        },
        other => {
            notices.push(Degradation::new(
                "composer",
                format!("{field} is {} instead of a string; dropping", value_kind(other)),
            ));
            None
        }
    }
}

/// Assemble the candidate projection from everything derived so far.
#[allow(clippy::too_many_arguments)]
pub fn compose(
    execution_id: &str,
    project_id: &str,
    metadata: &Map<String, Value>,
    status: ExecutionStatus,
    progress: f64,
    current_task: Option<String>,
    tally: &NodeTally,
    notices: &mut Vec<Degradation>,
) -> StatusProjection {
    let artifacts = build_artifacts(metadata, notices);
    let totals = build_totals(tally, notices);
    let started_at = parse_timestamp(metadata, STARTED_AT_KEYS, "started_at", notices);
    let updated_at = parse_timestamp(metadata, UPDATED_AT_KEYS, "updated_at", notices);

    StatusProjection {
        execution_id: execution_id.to_string(),
        project_id: project_id.to_string(),
        customer_id: status_deriver::customer_id(project_id),
        status,
        progress,
        current_task,
        branch: artifacts.branch.clone(),
        artifacts: Some(artifacts),
        totals,
        started_at,
        updated_at,
    }
}
