//! Property-based test generators using proptest.

use drvbridge_core::Value;
use proptest::prelude::*;
use serde_json::json;

/// Strategy for JSON scalars that survive a serialize/parse cycle unchanged.
pub fn json_scalar_strategy() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(|b| json!(b)),
        any::<i64>().prop_map(|n| json!(n)),
        ".{0,16}".prop_map(|s| json!(s)),
    ]
}

/// Strategy for nested JSON documents (maps and lists at the top level).
pub fn json_document_strategy() -> impl Strategy<Value = serde_json::Value> {
    let leaf = json_scalar_strategy();
    let nested = leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..4)
                .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
        ]
    })
    .boxed();
    prop_oneof![
        prop::collection::vec(nested.clone(), 0..4).prop_map(serde_json::Value::Array),
        prop::collection::btree_map("[a-z]{1,8}", nested, 0..4)
            .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
    ]
}

/// Strategy for argument values that are neither text, bytes, null, map nor list.
pub fn non_text_scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        (-1.0e6f64..1.0e6).prop_map(Value::Float),
    ]
}
