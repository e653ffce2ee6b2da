//! Wrapper unwrapping — finds the real analysis payload inside the
//! container shapes the upstream API has used across versions.
//!
//! Historically the useful object has shipped bare, under `parsedJson`,
//! under `rawResponse.parsedJson`, as the first element of an array, or
//! behind a chain of `rawResponse`/`response` envelopes. Unwrapping is
//! advisory: field extraction also searches a flattened view, so stopping
//! at the wrong level loses data only when both mechanisms miss.

use serde_json::Value;

/// Returns the most plausible extraction source inside `value`.
///
/// Wrapper patterns are tried in a fixed priority order, stopping at the
/// first match:
/// 1. `parsedJson`, when it is an object;
/// 2. `rawResponse.parsedJson`, when present;
/// 3. the first element of an array, recursively;
/// 4. an object-valued `rawResponse` or `response`, recursively (in that
///    order).
///
/// Anything else comes back unchanged. The result can be a string (some
/// wrappers hold the payload JSON-encoded); callers route those through
/// text recovery.
pub fn unwrap_payload(value: &Value) -> &Value {
    if let Some(parsed) = value.get("parsedJson").filter(|v| v.is_object()) {
        return parsed;
    }
    if let Some(parsed) = value.get("rawResponse").and_then(|r| r.get("parsedJson")) {
        return parsed;
    }
    if let Value::Array(items) = value {
        if let Some(first) = items.first() {
            return unwrap_payload(first);
        }
    }
    for key in ["rawResponse", "response"] {
        if let Some(inner) = value.get(key).filter(|v| v.is_object()) {
            return unwrap_payload(inner);
        }
    }
    value
}
