//! # Extractor - Tolerant Field Retrieval
//!
//! Pulls sub-mappings and logical fields out of a raw `task_context`,
//! tolerating every historical schema shape the workers have produced.
//! Extraction gaps degrade with a recorded notice instead of failing; the
//! hard error type for structurally mandatory fields is reserved for
//! future schema versions.

use std::str::FromStr;
use std::sync::OnceLock;

use serde_json::{Map, Value};

use super::Degradation;

/// Ordered candidate key spellings per logical field. Workers have drifted
/// between snake_case and camelCase across versions; the first present key
/// wins.
pub const TASK_ID_KEYS: &[&str] = &["task_id", "taskId"];
pub const REPO_PATH_KEYS: &[&str] = &["repo_path", "repoPath"];
pub const BRANCH_KEYS: &[&str] = &["branch"];
pub const LOGS_KEYS: &[&str] = &["logs"];
pub const FILES_MODIFIED_KEYS: &[&str] = &["files_modified", "filesModified"];
pub const STARTED_AT_KEYS: &[&str] = &["started_at", "startedAt"];
pub const UPDATED_AT_KEYS: &[&str] = &["updated_at", "updatedAt"];

/// Per-node execution state as recorded by workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    Completed,
    Running,
    Idle,
    Error,
}

impl FromStr for NodeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(Self::Completed),
            "running" => Ok(Self::Running),
            "idle" => Ok(Self::Idle),
            "error" => Ok(Self::Error),
            _ => Err(format!("Invalid node status: {s}")),
        }
    }
}

fn empty_map() -> &'static Map<String, Value> {
    static EMPTY: OnceLock<Map<String, Value>> = OnceLock::new();
    EMPTY.get_or_init(Map::new)
}

/// Short JSON type name for degradation notices.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Retrieve a named sub-mapping from the task context.
///
/// A missing key yields an empty mapping silently; a key present with a
/// non-mapping value also yields an empty mapping but records a
/// degraded-operation notice. Never a hard failure.
pub fn section<'a>(
    ctx: &'a Map<String, Value>,
    key: &str,
    notices: &mut Vec<Degradation>,
) -> &'a Map<String, Value> {
    match ctx.get(key) {
        None => empty_map(),
        Some(Value::Object(map)) => map,
        Some(other) => {
            notices.push(Degradation::new(
                "extractor",
                format!(
                    "'{key}' is {} instead of an object; substituting empty",
                    value_kind(other)
                ),
            ));
            empty_map()
        }
    }
}

/// Return the first present value among the candidate key spellings.
pub fn resolve_field<'a>(map: &'a Map<String, Value>, candidates: &[&str]) -> Option<&'a Value> {
    candidates.iter().find_map(|key| map.get(*key))
}

/// Resolve a logical string field across its candidate spellings.
///
/// A present but non-string value degrades to absent with a notice.
pub fn resolve_string(
    map: &Map<String, Value>,
    candidates: &[&str],
    field: &str,
    notices: &mut Vec<Degradation>,
) -> Option<String> {
    match resolve_field(map, candidates)? {
        Value::String(s) => Some(s.clone()),
        other => {
            notices.push(Degradation::new(
                "extractor",
                format!("'{field}' is {} instead of a string; dropping", value_kind(other)),
            ));
            None
        }
    }
}

/// Resolve a logical string-sequence field across its candidate spellings.
///
/// A non-array value, or an array containing any non-string element,
/// degrades the whole field to empty with a notice.
pub fn resolve_string_seq(
    map: &Map<String, Value>,
    candidates: &[&str],
    field: &str,
    notices: &mut Vec<Degradation>,
) -> Vec<String> {
    let Some(raw) = resolve_field(map, candidates) else {
        return Vec::new();
    };
    let Value::Array(items) = raw else {
        notices.push(Degradation::new(
            "extractor",
            format!(
                "'{field}' is {} instead of an array; substituting empty",
                value_kind(raw)
            ),
        ));
        return Vec::new();
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) => out.push(s.clone()),
            other => {
                notices.push(Degradation::new(
                    "extractor",
                    format!(
                        "'{field}' contains {} instead of a string; substituting empty",
                        value_kind(other)
                    ),
                ));
                return Vec::new();
            }
        }
    }
    out
}

/// Resolve a node's status across both historical shapes.
///
/// The modern shape carries `status` directly; the legacy shape nests it
/// under `event_data.status`. Both resolve identically for equal embedded
/// values. A non-mapping node, a non-string status, or an unrecognized
/// status string all resolve to "no status" with a notice; a node with no
/// status key at all is a normal not-yet-started shape and resolves to
/// "no status" silently.
pub fn node_status(
    node_id: &str,
    node: &Value,
    notices: &mut Vec<Degradation>,
) -> Option<NodeStatus> {
    let Value::Object(map) = node else {
        notices.push(Degradation::new(
            "extractor",
            format!(
                "node '{node_id}' is {} instead of an object; treating as no status",
                value_kind(node)
            ),
        ));
        return None;
    };

    let raw = match map.get("status") {
        Some(direct) => Some(direct),
        None => map
            .get("event_data")
            .and_then(Value::as_object)
            .and_then(|event_data| event_data.get("status")),
    };

    match raw {
        None => None,
        Some(Value::String(s)) => match s.parse::<NodeStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                notices.push(Degradation::new(
                    "extractor",
                    format!("node '{node_id}' has unrecognized status '{s}'; treating as no status"),
                ));
                None
            }
        },
        Some(other) => {
            notices.push(Degradation::new(
                "extractor",
                format!(
                    "node '{node_id}' status is {} instead of a string; treating as no status",
                    value_kind(other)
                ),
            ));
            None
        }
    }
}
