//! End-to-end tests for the transformation pipeline: derivation rules,
//! fallback field resolution, invariants, and the outer safety boundary.

mod common;

use chrono::{DateTime, Utc};
use projection_core::{ExecutionStatus, StatusProjection, StatusTransformer, TransformRequest};
use serde_json::json;

use common::{context, legacy_node, node};

fn transform(ctx: &serde_json::Value) -> StatusProjection {
    StatusTransformer::default().transform("exec-1", "proj-1", ctx)
}

#[test]
fn test_all_nodes_completed_yields_completed_at_full_progress() {
    let ctx = context(
        json!({}),
        json!({"a": node("completed"), "b": node("completed")}),
    );
    let projection = transform(&ctx);
    assert_eq!(projection.status, ExecutionStatus::Completed);
    assert_eq!(projection.progress, 100.0);
    assert_eq!(projection.totals.completed, 2);
    assert_eq!(projection.totals.total, 2);
}

#[test]
fn test_error_node_dominates_all_other_states() {
    let ctx = context(
        json!({"task_id": "T1"}),
        json!({
            "a": node("completed"),
            "b": node("running"),
            "c": node("error"),
        }),
    );
    let projection = transform(&ctx);
    assert_eq!(projection.status, ExecutionStatus::Error);
}

#[test]
fn test_mixed_scenario_end_to_end() {
    let ctx = context(
        json!({}),
        json!({
            "a": node("completed"),
            "b": legacy_node("running"),
            "c": node("idle"),
        }),
    );
    let projection = transform(&ctx);
    assert_eq!(projection.totals.completed, 1);
    assert_eq!(projection.totals.total, 3);
    assert_eq!(projection.status, ExecutionStatus::Running);
    assert!((projection.progress - 100.0 / 3.0).abs() < 1e-9);
    assert!(projection.current_task.is_some());
}

#[test]
fn test_fallback_task_naming_equivalence() {
    let snake = context(
        json!({"task_id": "T1"}),
        json!({"a": node("running")}),
    );
    let camel = context(
        json!({"taskId": "T1"}),
        json!({"a": node("running")}),
    );
    assert_eq!(
        transform(&snake).current_task,
        transform(&camel).current_task
    );
    assert_eq!(transform(&snake).current_task.as_deref(), Some("T1"));
}

#[test]
fn test_nested_node_shape_equivalence() {
    let direct = context(json!({}), json!({"a": node("completed")}));
    let nested = context(json!({}), json!({"a": legacy_node("completed")}));
    let direct_projection = transform(&direct);
    let nested_projection = transform(&nested);
    assert_eq!(direct_projection.status, nested_projection.status);
    assert_eq!(direct_projection.totals, nested_projection.totals);
}

#[test]
fn test_idle_nodes_yield_no_current_task() {
    let ctx = context(
        json!({"task_id": "T1"}),
        json!({"a": node("idle"), "b": node("idle")}),
    );
    let projection = transform(&ctx);
    assert_eq!(projection.status, ExecutionStatus::Idle);
    assert_eq!(projection.current_task, None);
}

#[test]
fn test_running_node_yields_current_task_without_metadata() {
    let ctx = context(json!({}), json!({"worker": node("running")}));
    let projection = transform(&ctx);
    assert_eq!(projection.status, ExecutionStatus::Running);
    assert_eq!(projection.current_task.as_deref(), Some("worker"));
}

#[test]
fn test_customer_id_extraction() {
    let ctx = context(json!({}), json!({}));
    let with_customer =
        StatusTransformer::default().transform("exec-1", "cust-1/proj-2", &ctx);
    assert_eq!(with_customer.customer_id.as_deref(), Some("cust-1"));

    let without_customer = StatusTransformer::default().transform("exec-1", "no-slash", &ctx);
    assert_eq!(without_customer.customer_id, None);
}

#[test]
fn test_prepared_metadata_upgrades_idle_to_initializing() {
    let ctx = context(json!({"status": "prepared"}), json!({}));
    let projection = transform(&ctx);
    assert_eq!(projection.status, ExecutionStatus::Initializing);
    assert_eq!(projection.current_task, None);
}

#[test]
fn test_empty_context_yields_idle_zero_progress() {
    let projection = transform(&json!({}));
    assert_eq!(projection.status, ExecutionStatus::Idle);
    assert_eq!(projection.progress, 0.0);
    assert_eq!(projection.totals.total, 0);
}

#[test]
fn test_wrong_typed_sections_degrade_but_answer() {
    let transformer = StatusTransformer::default();
    let ctx = json!({"metadata": [1, 2], "nodes": "oops", "extra": true});
    let projection = transformer.transform("exec-1", "proj-1", &ctx);
    assert_eq!(projection.status, ExecutionStatus::Idle);

    let snapshot = transformer.telemetry().snapshot();
    assert_eq!(snapshot.degraded, 1);
    assert_eq!(snapshot.fallback, 0);
}

#[test]
fn test_non_mapping_context_falls_back_to_error_projection() {
    let transformer = StatusTransformer::default();
    for ctx in [json!(null), json!("ctx"), json!(7), json!([1])] {
        let projection = transformer.transform("exec-1", "proj-1", &ctx);
        assert_eq!(projection.status, ExecutionStatus::Error);
        assert_eq!(projection.progress, 0.0);
        assert_eq!(projection.current_task, None);
        assert_eq!(projection.totals.total, 0);
    }
    assert_eq!(transformer.telemetry().snapshot().fallback, 4);
}

#[test]
fn test_empty_identifiers_fall_back() {
    let transformer = StatusTransformer::default();
    let ctx = context(json!({}), json!({}));
    let projection = transformer.transform("", "proj-1", &ctx);
    assert_eq!(projection.status, ExecutionStatus::Error);
    assert_eq!(transformer.telemetry().snapshot().fallback, 1);
}

#[test]
fn test_timestamps_parse_and_degrade_independently() {
    let ctx = context(
        json!({
            "startedAt": "2026-03-01T10:15:00Z",
            "updated_at": "not-a-timestamp",
        }),
        json!({}),
    );
    let projection = transform(&ctx);
    assert_eq!(
        projection.started_at,
        Some("2026-03-01T10:15:00Z".parse::<DateTime<Utc>>().unwrap())
    );
    assert_eq!(projection.updated_at, None);
}

#[test]
fn test_artifacts_resolution_and_branch_mirroring() {
    let ctx = context(
        json!({
            "repoPath": "/srv/checkout",
            "branch": "exec/42",
            "logs": ["cloned", "built"],
            "files_modified": ["src/lib.rs", "Cargo.toml"],
        }),
        json!({}),
    );
    let projection = transform(&ctx);
    let artifacts = projection.artifacts.expect("artifacts present");
    assert_eq!(artifacts.repo_path.as_deref(), Some("/srv/checkout"));
    assert_eq!(artifacts.logs, vec!["cloned", "built"]);
    assert_eq!(artifacts.files_modified, vec!["src/lib.rs", "Cargo.toml"]);
    assert_eq!(projection.branch.as_deref(), Some("exec/42"));
}

#[test]
fn test_transform_batch_matches_single_calls() {
    let transformer = StatusTransformer::default();
    let requests = vec![
        TransformRequest {
            execution_id: "exec-1".to_string(),
            project_id: "cust/one".to_string(),
            task_context: context(json!({}), json!({"a": node("completed")})),
        },
        TransformRequest {
            execution_id: "exec-2".to_string(),
            project_id: "cust/two".to_string(),
            task_context: json!(false),
        },
    ];
    let batch = transformer.transform_batch(&requests);
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].status, ExecutionStatus::Completed);
    assert_eq!(batch[0].execution_id, "exec-1");
    assert_eq!(batch[1].status, ExecutionStatus::Error);
}

#[test]
fn test_repeated_calls_are_identical() {
    let transformer = StatusTransformer::default();
    let ctx = context(
        json!({"task_id": "T1", "startedAt": "2026-03-01T10:15:00Z"}),
        json!({"a": node("completed"), "b": legacy_node("running")}),
    );
    let first = transformer.transform("exec-1", "cust/proj", &ctx);
    let second = transformer.transform("exec-1", "cust/proj", &ctx);
    assert_eq!(first, second);
}

#[test]
fn test_projection_serializes_status_as_snake_case_string() {
    let ctx = context(json!({"status": "prepared"}), json!({}));
    let projection = transform(&ctx);
    let serialized = serde_json::to_value(&projection).unwrap();
    assert_eq!(serialized["status"], "initializing");
    assert!(serialized.get("current_task").is_none());
}
