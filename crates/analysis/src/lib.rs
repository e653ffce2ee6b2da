//! Raw-LLM-response normalization for resume screening.
//!
//! Screening asks an external model to pull skills, work history, red
//! flags, and a match score out of a candidate's resume. What comes back
//! is unpredictable: clean JSON on a good day, JSON buried in prose or
//! markdown fences, Python-literal dicts, double-encoded strings, or the
//! payload nested under wrapper keys that drifted across upstream
//! versions. This crate turns any of that into one [`CanonicalAnalysis`]
//! record and never fails doing it — bad input degrades to an empty or
//! summary-only record, because a screening row showing "no data" beats a
//! screening row that crashed the table.
//!
//! Entry points: [`normalize`] for pre-parsed JSON values,
//! [`normalize_text`] for raw text.

pub mod envelope;
pub mod extract;
pub mod flatten;
pub mod model;
pub mod normalizer;
pub mod recovery;

pub use model::CanonicalAnalysis;
pub use normalizer::{normalize, normalize_text};
