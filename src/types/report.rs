//! Final report types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NarrativeSource;

/// Narrative report closing out one analysis. The structured stage outputs
/// travel alongside it in the response; this holds the identifier, headline
/// verdict, and generated narrative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalReport {
    /// Unique report identifier (timestamp + random suffix).
    pub report_id: String,
    pub generated_at: DateTime<Utc>,
    /// One-line verdict for dashboards and logs.
    pub headline: String,
    /// Narrative section from the text-generation collaborator or the
    /// deterministic template fallback.
    pub narrative: String,
    pub narrative_source: NarrativeSource,
}
