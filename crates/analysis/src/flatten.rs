//! Dot-path projection of nested JSON — the fallback search space for
//! field extraction when no direct key matches.

use serde_json::Value;

/// Flattens `value` into `(dot-joined path, leaf)` pairs in document order.
///
/// Only objects are recursed into; arrays, primitives, and nulls are
/// leaves under their current path. A non-object input yields an empty
/// view. Depth is bounded by the input itself: parsed JSON is acyclic and
/// the parser caps nesting, so no explicit limit is enforced here.
pub fn flatten(value: &Value) -> Vec<(String, &Value)> {
    let mut leaves = Vec::new();
    if let Value::Object(map) = value {
        for (key, child) in map {
            walk(key.clone(), child, &mut leaves);
        }
    }
    leaves
}

fn walk<'a>(path: String, value: &'a Value, leaves: &mut Vec<(String, &'a Value)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                walk(format!("{path}.{key}"), child, leaves);
            }
        }
        _ => leaves.push((path, value)),
    }
}
