//! Canonical analysis record — the one shape every raw LLM response is
//! normalized into before the screening UI touches it.
//!
//! The serialized key names are part of the contract with the display
//! layer: skills render as tags, work history as a timeline, red flags as
//! a list, summary as prose, and score as a percentage badge.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The normalized result of screening one candidate against one job.
///
/// Constructed fresh on every normalization call and never mutated
/// afterward. `Default` is the zero-value record, returned whenever
/// nothing could be recovered from the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalAnalysis {
    /// Skill entries in source order, duplicates kept. Elements are bare
    /// strings or skill-detail objects; object sub-fields stay loosely
    /// typed because upstream never committed to a schema.
    #[serde(default)]
    pub skills: Vec<Value>,
    /// Job entries in source order. Object elements carry `title`,
    /// `company`, `startDate`, `endDate`, `description` and friends in
    /// both camelCase and PascalCase spellings after normalization.
    #[serde(default)]
    pub work_history: Vec<Value>,
    /// Red-flag entries in source order. Bare strings are wrapped into
    /// `{description, Description}` objects during extraction so the UI
    /// can read one field uniformly.
    #[serde(default)]
    pub red_flags: Vec<Value>,
    /// Free-form summary, empty when not found. Holds the trimmed input
    /// text when a string payload carried no recoverable JSON.
    #[serde(default)]
    pub summary: String,
    /// Match score, nominally 0–100. 0 when absent or non-numeric; never
    /// clamped.
    #[serde(default)]
    pub score: f64,
    /// The JSON value extraction actually ran against, kept for audit and
    /// re-run debugging. Null when nothing was recovered.
    #[serde(default)]
    pub raw_data: Value,
}

impl CanonicalAnalysis {
    /// Record for text that carried no recoverable JSON: the trimmed text
    /// becomes the summary and every other field stays at its zero value.
    pub fn summary_only(text: &str) -> Self {
        Self {
            summary: text.trim().to_string(),
            ..Self::default()
        }
    }

    /// True when every extracted field sits at its zero value. `raw_data`
    /// is not considered; it is an audit field, not an extraction result.
    /// A UI should render this as "nothing extracted", not as an error.
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
            && self.work_history.is_empty()
            && self.red_flags.is_empty()
            && self.summary.is_empty()
            && self.score == 0.0
    }
}
