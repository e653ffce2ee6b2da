//! Top-level normalization — the total entry point that turns whatever an
//! LLM returned into a [`CanonicalAnalysis`].
//!
//! Every failure mode degrades instead of propagating: text with no
//! recoverable JSON becomes a summary-only record, an unrecognizable value
//! becomes the zero record. Callers never see an error; per-row call sites
//! in a results table depend on that.

use serde_json::Value;
use tracing::{debug, warn};

use crate::envelope::unwrap_payload;
use crate::extract::{
    extract_red_flags, extract_score, extract_skills, extract_summary, extract_work_history,
    has_recognized_field,
};
use crate::model::CanonicalAnalysis;
use crate::recovery::recover_json;

/// Normalizes a pre-parsed payload (a response body, a stored blob, a
/// field inside either). Total: any input yields a well-shaped record.
pub fn normalize(raw: &Value) -> CanonicalAnalysis {
    match raw {
        Value::Null => CanonicalAnalysis::default(),
        Value::String(text) => normalize_text(text),
        other => normalize_value(other),
    }
}

/// Normalizes a textual payload. Total: text with no recoverable JSON
/// becomes a summary-only record, empty text the zero record.
pub fn normalize_text(text: &str) -> CanonicalAnalysis {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return CanonicalAnalysis::default();
    }
    match recover_json(text) {
        // A recovered string is a payload in its own right (double-encoded
        // responses). It is strictly shorter than its encoding, so the
        // re-entry terminates.
        Ok(Value::String(inner)) => normalize_text(&inner),
        Ok(value) => normalize_value(&value),
        Err(err) => {
            warn!("no JSON recovered, keeping text as summary: {err}");
            CanonicalAnalysis::summary_only(trimmed)
        }
    }
}

/// Extraction path for non-string values: unwrap containers, pick the
/// source, run the five extractors.
fn normalize_value(raw: &Value) -> CanonicalAnalysis {
    let unwrapped = unwrap_payload(raw);

    // Wrappers sometimes hold the payload as a JSON-encoded string (an
    // array of strings, a string-valued parsedJson). Recover it like any
    // other text.
    if let Value::String(text) = unwrapped {
        debug!("unwrapped a string payload, rerouting through text recovery");
        return normalize_text(text);
    }

    let source = if has_recognized_field(unwrapped) || raw.is_array() {
        // For arrays the unwrapped element is the only searchable value:
        // the flattened view never crosses arrays, so the shell itself
        // cannot yield anything.
        unwrapped
    } else {
        // No known key at the unwrapped level: search the whole original
        // value through the flattened fallback instead.
        raw
    };

    assemble(source)
}

fn assemble(source: &Value) -> CanonicalAnalysis {
    let record = CanonicalAnalysis {
        skills: extract_skills(source),
        work_history: extract_work_history(source),
        red_flags: extract_red_flags(source),
        summary: extract_summary(source),
        score: extract_score(source),
        raw_data: source.clone(),
    };
    if record.is_empty() {
        debug!("extraction found no fields in payload");
    }
    record
}
