//! # Status Deriver - Core Derivation Algorithm
//!
//! Single pass over all nodes that reconciles many independent node states
//! into one authoritative [`ExecutionStatus`], with precise tie-break
//! rules, a guarded progress calculation, and customer derivation.
//!
//! The deriver is also where the status/current-task invariants are
//! enforced. An idle execution never carries a task and a running
//! execution always does, by construction here - the finalizer's check is
//! a safety assertion, not the enforcement point.

use serde_json::{Map, Value};

use crate::models::ExecutionStatus;

use super::extractor::{self, NodeStatus, TASK_ID_KEYS};
use super::Degradation;

/// Accumulated node-state counts from a single pass over all nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeTally {
    pub completed: u64,
    pub total: u64,
    pub saw_error: bool,
    pub saw_running: bool,
    /// First node observed running, in deterministic map order
    first_running: Option<String>,
    /// First node observed in any unfinished state
    first_unfinished: Option<String>,
}

/// Tally every node's resolved status in one pass.
///
/// Nodes without a resolvable status still count toward `total` so that a
/// corrupted node dilutes progress rather than disappearing.
pub fn tally_nodes(nodes: &Map<String, Value>, notices: &mut Vec<Degradation>) -> NodeTally {
    let mut tally = NodeTally::default();
    for (node_id, node) in nodes {
        tally.total += 1;
        match extractor::node_status(node_id, node, notices) {
            Some(NodeStatus::Completed) => {
                tally.completed += 1;
                continue;
            }
            Some(NodeStatus::Running) => {
                tally.saw_running = true;
                if tally.first_running.is_none() {
                    tally.first_running = Some(node_id.clone());
                }
            }
            Some(NodeStatus::Error) => tally.saw_error = true,
            Some(NodeStatus::Idle) | None => {}
        }
        if tally.first_unfinished.is_none() {
            tally.first_unfinished = Some(node_id.clone());
        }
    }
    tally
}

/// Derive the overall status from the tally. First matching rule wins:
/// error, completed, running, idle. A metadata `status` of `"prepared"`
/// upgrades idle to initializing; any other metadata status string is
/// recorded but never overrides derivation.
pub fn derive_status(
    tally: &NodeTally,
    metadata: &Map<String, Value>,
    notices: &mut Vec<Degradation>,
) -> ExecutionStatus {
    let derived = if tally.saw_error {
        ExecutionStatus::Error
    } else if tally.total > 0 && tally.completed == tally.total {
        ExecutionStatus::Completed
    } else if tally.saw_running || (tally.completed > 0 && tally.completed < tally.total) {
        ExecutionStatus::Running
    } else {
        ExecutionStatus::Idle
    };

    match metadata.get("status") {
        None => derived,
        Some(Value::String(s)) if s == "prepared" => {
            if derived == ExecutionStatus::Idle {
                ExecutionStatus::Initializing
            } else {
                derived
            }
        }
        Some(Value::String(s)) => {
            if s.parse::<ExecutionStatus>().is_err() {
                notices.push(Degradation::new(
                    "status_deriver",
                    format!("unrecognized metadata status '{s}'; derivation unaffected"),
                ));
            }
            derived
        }
        Some(other) => {
            notices.push(Degradation::new(
                "status_deriver",
                format!(
                    "metadata status is {} instead of a string; derivation unaffected",
                    extractor::value_kind(other)
                ),
            ));
            derived
        }
    }
}

/// Completion percentage, guarded against an empty tally and clamped into
/// `[0.0, 100.0]` with a notice if it ever lands outside.
pub fn progress(tally: &NodeTally, notices: &mut Vec<Degradation>) -> f64 {
    if tally.total == 0 {
        return 0.0;
    }
    let pct = tally.completed as f64 / tally.total as f64 * 100.0;
    if !pct.is_finite() {
        notices.push(Degradation::new(
            "status_deriver",
            format!("progress is not finite ({pct}); substituting 0.0"),
        ));
        return 0.0;
    }
    if !(0.0..=100.0).contains(&pct) {
        notices.push(Degradation::new(
            "status_deriver",
            format!("progress {pct} outside [0, 100]; clamping"),
        ));
        return pct.clamp(0.0, 100.0);
    }
    pct
}

/// Derive the customer from a `"<customer>/<rest>"` project identifier.
/// A separator-less or empty-prefixed project id yields no customer.
pub fn customer_id(project_id: &str) -> Option<String> {
    project_id
        .split_once('/')
        .map(|(customer, _)| customer.to_string())
        .filter(|customer| !customer.is_empty())
}

/// Resolve `current_task` while guaranteeing the status invariants.
///
/// Idle and initializing executions never carry a task, even when the
/// metadata names one. Running executions always do: the metadata
/// `task_id`/`taskId` fallback when present, else the first running node,
/// else the first unfinished node - one of which always exists when
/// derivation yields running.
pub fn current_task(
    status: ExecutionStatus,
    metadata: &Map<String, Value>,
    tally: &NodeTally,
    notices: &mut Vec<Degradation>,
) -> Option<String> {
    let named = extractor::resolve_string(metadata, TASK_ID_KEYS, "task_id", notices);
    match status {
        ExecutionStatus::Idle | ExecutionStatus::Initializing => {
            if let Some(task) = named {
                notices.push(Degradation::new(
                    "status_deriver",
                    format!("metadata names task '{task}' while {status}; dropping"),
                ));
            }
            None
        }
        ExecutionStatus::Running => named
            .or_else(|| tally.first_running.clone())
            .or_else(|| tally.first_unfinished.clone()),
        ExecutionStatus::Completed | ExecutionStatus::Error => named,
    }
}
