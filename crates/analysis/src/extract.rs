//! Field extraction — the two-phase synonym lookup that pulls the five
//! canonical fields out of whatever recovery and unwrapping produced.
//!
//! Key names are ordered data, not code: the upstream prompt has drifted
//! through PascalCase, snake_case, spaced, and camelCase spellings over
//! time, and every spelling ever observed stays in its table. Table order
//! is the priority order — first match wins, no merging across synonyms.
//! Adding a spelling is a data change.

use serde_json::{json, Map, Value};

use crate::flatten::flatten;

// ────────────────────────────────────────────────────────────────────────────
// Synonym tables (order = priority)
// ────────────────────────────────────────────────────────────────────────────

/// Key spellings for the skills list. `Skills` is the historical primary
/// and wins over the lowercase spelling when both are present.
pub const SKILL_KEYS: &[&str] = &[
    "Skills",
    "skills",
    "technical_skills",
    "Technical_Skills",
    "technicalSkills",
    "skill_list",
    "key_skills",
    "Key Skills",
];

/// Key spellings for the work-history list.
pub const WORK_HISTORY_KEYS: &[&str] = &[
    "Work_History",
    "workHistory",
    "work_history",
    "WorkHistory",
    "Work History",
    "work history",
    "Experience",
    "experience",
    "work_experience",
    "employment_history",
];

/// Key spellings for the red-flags list.
pub const RED_FLAG_KEYS: &[&str] = &[
    "Red_Flags",
    "redFlags",
    "red_flags",
    "RedFlags",
    "Red Flags",
    "red flags",
    "Concerns",
    "concerns",
    "warnings",
];

/// Key spellings for the summary text.
pub const SUMMARY_KEYS: &[&str] = &[
    "Summary",
    "summary",
    "Overview",
    "overview",
    "analysis_summary",
    "candidate_summary",
    "profile_summary",
];

/// Key spellings for the match score. `matching_score` is the historical
/// primary.
pub const SCORE_KEYS: &[&str] = &[
    "matching_score",
    "Matching_Score",
    "matchScore",
    "match_score",
    "Score",
    "score",
    "overall_score",
    "fit_score",
];

const ALL_FIELD_KEYS: &[&[&str]] = &[
    SKILL_KEYS,
    WORK_HISTORY_KEYS,
    RED_FLAG_KEYS,
    SUMMARY_KEYS,
    SCORE_KEYS,
];

/// True when `value` is an object carrying any known field synonym as a
/// direct key. Drives the choice between extracting from an unwrapped
/// container and falling back to the whole original value.
pub fn has_recognized_field(value: &Value) -> bool {
    match value.as_object() {
        Some(map) => ALL_FIELD_KEYS
            .iter()
            .any(|keys| keys.iter().any(|key| map.contains_key(*key))),
        None => false,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Two-phase lookup
// ────────────────────────────────────────────────────────────────────────────

/// Finds a field value: direct case-sensitive synonym probes first, then a
/// case-insensitive containment scan over the flattened view, in document
/// order. `accept` decides whether a candidate is non-empty and well typed;
/// rejected candidates are skipped, never errors.
fn find_field<'a>(
    source: &'a Value,
    keys: &[&str],
    accept: fn(&Value) -> bool,
) -> Option<&'a Value> {
    if let Some(map) = source.as_object() {
        for key in keys {
            if let Some(candidate) = map.get(*key) {
                if accept(candidate) {
                    return Some(candidate);
                }
            }
        }
    }

    let needles: Vec<String> = keys.iter().map(|key| key.to_lowercase()).collect();
    for (path, leaf) in flatten(source) {
        let path_lower = path.to_lowercase();
        if needles.iter().any(|needle| path_lower.contains(needle.as_str())) && accept(leaf) {
            return Some(leaf);
        }
    }

    None
}

fn non_empty_list(value: &Value) -> bool {
    value.as_array().map_or(false, |items| !items.is_empty())
}

fn non_empty_text(value: &Value) -> bool {
    value.as_str().map_or(false, |text| !text.trim().is_empty())
}

fn coercible_number(value: &Value) -> bool {
    coerce_score(value).is_some()
}

/// Coerces a candidate score to `f64`: JSON numbers pass through, strings
/// get a trimmed parse. Booleans, nulls, and containers are type
/// mismatches, and non-finite results are rejected, so the caller keeps
/// scanning.
fn coerce_score(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

// ────────────────────────────────────────────────────────────────────────────
// Element shaping
// ────────────────────────────────────────────────────────────────────────────

/// Zero value assigned to a known sub-field the element is missing.
#[derive(Clone, Copy)]
enum SubfieldZero {
    Text,
    Count,
    Flag,
}

impl SubfieldZero {
    fn value(self) -> Value {
        match self {
            SubfieldZero::Text => Value::String(String::new()),
            SubfieldZero::Count => json!(0),
            SubfieldZero::Flag => Value::Bool(false),
        }
    }
}

/// Known sub-fields of a skill-detail object.
const SKILL_FIELDS: &[(&str, SubfieldZero)] = &[
    ("name", SubfieldZero::Text),
    ("category", SubfieldZero::Text),
    ("proficiency", SubfieldZero::Text),
];

/// Known sub-fields of a job entry.
const JOB_FIELDS: &[(&str, SubfieldZero)] = &[
    ("title", SubfieldZero::Text),
    ("company", SubfieldZero::Text),
    ("startDate", SubfieldZero::Text),
    ("endDate", SubfieldZero::Text),
    ("description", SubfieldZero::Text),
    ("durationMonths", SubfieldZero::Count),
    ("isCurrentRole", SubfieldZero::Flag),
    ("location", SubfieldZero::Text),
];

/// Known sub-fields of a red-flag entry.
const RED_FLAG_FIELDS: &[(&str, SubfieldZero)] = &[
    ("description", SubfieldZero::Text),
    ("impact", SubfieldZero::Text),
    ("severity", SubfieldZero::Text),
];

/// Normalizes one list element. Objects come back as a copy exposing both
/// the camelCase and PascalCase spelling of every known sub-field, with
/// missing ones filled by their zero value and unknown keys kept as-is.
/// Bare strings are wrapped into `{description, Description}` objects when
/// `wrap_strings` is set (red flags only); any other element passes
/// through untouched.
fn shape_element(element: &Value, known: &[(&str, SubfieldZero)], wrap_strings: bool) -> Value {
    match element {
        Value::Object(map) => {
            let mut shaped = map.clone();
            for (name, zero) in known {
                let value = subfield_value(map, name)
                    .cloned()
                    .unwrap_or_else(|| zero.value());
                shaped.insert((*name).to_string(), value.clone());
                shaped.insert(pascal_case(name), value);
            }
            Value::Object(shaped)
        }
        Value::String(text) if wrap_strings => json!({
            "description": text,
            "Description": text,
        }),
        other => other.clone(),
    }
}

/// Looks a known sub-field up under its camelCase, PascalCase, and
/// snake_case spellings, in that order.
fn subfield_value<'a>(map: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(name) {
        return Some(value);
    }
    if let Some(value) = map.get(&pascal_case(name)) {
        return Some(value);
    }
    map.get(&snake_case(name))
}

fn pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Per-field extractors
// ────────────────────────────────────────────────────────────────────────────

fn extract_list(
    source: &Value,
    keys: &[&str],
    known: &[(&str, SubfieldZero)],
    wrap_strings: bool,
) -> Vec<Value> {
    match find_field(source, keys, non_empty_list).and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .map(|element| shape_element(element, known, wrap_strings))
            .collect(),
        None => Vec::new(),
    }
}

/// Extracts the skills list. Source order and duplicates are kept; bare
/// strings pass through, object elements gain dual-cased sub-fields.
pub fn extract_skills(source: &Value) -> Vec<Value> {
    extract_list(source, SKILL_KEYS, SKILL_FIELDS, false)
}

/// Extracts the work-history list. Object elements gain dual-cased job
/// sub-fields with typed defaults; anything else passes through.
pub fn extract_work_history(source: &Value) -> Vec<Value> {
    extract_list(source, WORK_HISTORY_KEYS, JOB_FIELDS, false)
}

/// Extracts the red-flags list. Bare strings become
/// `{description, Description}` objects so the display layer reads one
/// field shape uniformly.
pub fn extract_red_flags(source: &Value) -> Vec<Value> {
    extract_list(source, RED_FLAG_KEYS, RED_FLAG_FIELDS, true)
}

/// Extracts the summary text, trimmed. Empty when nothing matches.
pub fn extract_summary(source: &Value) -> String {
    match find_field(source, SUMMARY_KEYS, non_empty_text).and_then(Value::as_str) {
        Some(text) => text.trim().to_string(),
        None => String::new(),
    }
}

/// Extracts the match score. 0 when nothing coerces to a finite number.
pub fn extract_score(source: &Value) -> f64 {
    find_field(source, SCORE_KEYS, coercible_number)
        .and_then(coerce_score)
        .unwrap_or(0.0)
}
