use proptest::prelude::*;
use serde_json::{json, Value};

/// Strategy for arbitrary JSON values, including deeply nested shapes.
pub fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        any::<f64>().prop_map(|f| json!(f)),
        "[a-zA-Z0-9_./-]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::hash_map("[a-z_]{1,10}", inner, 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

/// Strategy for node values across both historical shapes, well-formed and
/// malformed alike: direct status, nested event_data status, unknown
/// status strings, non-string statuses, and non-mapping nodes.
pub fn arb_node() -> impl Strategy<Value = Value> {
    let status = prop_oneof![
        Just("completed".to_string()),
        Just("running".to_string()),
        Just("idle".to_string()),
        Just("error".to_string()),
        "[a-z]{1,10}",
    ];
    prop_oneof![
        status.clone().prop_map(|s| json!({"status": s})),
        status.prop_map(|s| json!({"event_data": {"status": s}})),
        Just(json!({})),
        Just(json!({"status": 42})),
        Just(json!(null)),
        Just(json!([1, 2, 3])),
        Just(json!("not-a-node")),
    ]
}

/// Strategy for a task context whose nodes map holds arbitrary node values.
pub fn arb_nodes_context() -> impl Strategy<Value = Value> {
    prop::collection::hash_map("[a-z][a-z0-9_]{0,8}", arb_node(), 0..10).prop_map(|nodes| {
        json!({
            "metadata": {},
            "nodes": Value::Object(nodes.into_iter().collect()),
        })
    })
}

/// Strategy for fully arbitrary (usually malformed) task contexts.
pub fn arb_task_context() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_json(),
        (arb_json(), arb_json())
            .prop_map(|(metadata, nodes)| json!({"metadata": metadata, "nodes": nodes})),
        arb_nodes_context(),
    ]
}
