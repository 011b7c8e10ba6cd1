//! System-wide default constants.
//!
//! Centralises tunable magic numbers. Grouped by subsystem for easy
//! discovery. Values that are part of the numeric contract (fusion rule,
//! risk boundaries, confidence blend) live next to their logic instead.

// ============================================================================
// Models
// ============================================================================

/// Default directory for model weight artifacts.
pub const MODEL_ARTIFACT_DIR: &str = "models";

// ============================================================================
// Case Store
// ============================================================================

/// Default data directory for the embedded case store.
pub const CASE_STORE_DIR: &str = "data/case_store";

/// HTTP client timeout for the managed store backend (seconds).
pub const STORE_HTTP_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Diagnosis
// ============================================================================

/// Neighbors retrieved per diagnosis query.
pub const DIAGNOSIS_TOP_K: usize = 5;

/// Post-query similarity floor. Matches below this are dropped after
/// ranking.
pub const DIAGNOSIS_MIN_SIMILARITY: f64 = 0.5;

/// Per-family RUL spread (cycles) flagged as MODEL_DISAGREEMENT.
pub const MODEL_DISAGREEMENT_CYCLES: f64 = 40.0;

/// Per-family failure probability spread flagged as PROBABILITY_SPIKE.
pub const PROBABILITY_SPIKE_SPREAD: f64 = 0.4;

/// Max failure probability flagged as HIGH_FAILURE_PROBABILITY.
pub const HIGH_FAILURE_PROBABILITY: f64 = 0.8;

/// Max component probability below which the classifier is considered
/// uncertain.
pub const LOW_CLASSIFIER_CONFIDENCE: f64 = 0.4;

// ============================================================================
// Scheduling
// ============================================================================

/// Expected flight cycles per day for cycle/date conversion.
pub const CYCLES_PER_DAY: f64 = 6.0;

// ============================================================================
// Narrative
// ============================================================================

/// Per-call narrative service timeout (milliseconds).
pub const NARRATIVE_TIMEOUT_MS: u64 = 5_000;
