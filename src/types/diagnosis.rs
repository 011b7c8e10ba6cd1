//! Diagnosis stage output.

use serde::{Deserialize, Serialize};

use super::{ComponentId, ComponentProbabilities, SimilarityMatch};

/// Where a narrative text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeSource {
    /// External text-generation collaborator.
    Service,
    /// Deterministic template fallback.
    Template,
}

/// Failure-mode diagnosis for one request. Owned by the request's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisResult {
    /// Component selected by the resolution policy.
    pub probable_component: ComponentId,
    /// Raw classifier-predicted component, before neighbor evidence.
    pub model_predicted_component: ComponentId,
    /// Classifier component probabilities, consumed as-is.
    pub component_probabilities: ComponentProbabilities,
    /// Retrieved similar historical cases, best first.
    pub similar_cases: Vec<SimilarityMatch>,
    /// Heuristic anomaly flags (threshold checks on ensemble values).
    pub anomaly_tags: Vec<String>,
    /// Free-text reasoning for the selection.
    pub reasoning: String,
    /// Source of the reasoning text.
    pub reasoning_source: NarrativeSource,
    /// Blended confidence in [0, 1]:
    /// `0.7 * max_component_probability + 0.3 * mean_similarity`.
    pub confidence: f64,
}
