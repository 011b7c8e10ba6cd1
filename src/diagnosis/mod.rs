//! Diagnosis Resolver
//!
//! State-free per-request resolution of the probable failing component,
//! blending classifier confidence with nearest-neighbor evidence from the
//! historical case store.
//!
//! ## Component-selection policy, in order
//!
//! 1. Classifier override when its peak component probability exceeds 0.7
//! 2. Equal-weight majority vote over the retrieved cases' component
//!    labels, ties broken toward the highest average similarity among the
//!    tied candidates
//! 3. "General" fallback — signals low diagnostic certainty, not a
//!    specific failure mode
//!
//! Confidence is the fixed blend
//! `0.7 * max_component_probability + 0.3 * mean_similarity`.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::config::DiagnosisConfig;
use crate::narrative::{DiagnosisFacts, NarrativeEngine};
use crate::types::{
    ComponentId, ComponentProbabilities, DiagnosisResult, EnsemblePrediction, SimilarityMatch,
};

/// Classifier peak probability above which neighbor evidence is skipped.
const MODEL_OVERRIDE_THRESHOLD: f64 = 0.7;

/// Confidence blend weights. Contract-fixed.
const MODEL_CONFIDENCE_WEIGHT: f64 = 0.7;
const SIMILARITY_CONFIDENCE_WEIGHT: f64 = 0.3;

/// Resolves a diagnosis from ensemble output plus neighbor evidence.
pub struct DiagnosisResolver {
    narrative: Arc<NarrativeEngine>,
}

impl DiagnosisResolver {
    pub fn new(narrative: Arc<NarrativeEngine>) -> Self {
        Self { narrative }
    }

    /// Resolve one request.
    ///
    /// `matches` is the ranked query result; the `min_similarity` floor is
    /// applied here, after ranking, per the store contract. Returns the
    /// diagnosis plus any warnings to record on the request state.
    pub async fn resolve(
        &self,
        prediction: &EnsemblePrediction,
        matches: Vec<SimilarityMatch>,
        config: &DiagnosisConfig,
    ) -> (DiagnosisResult, Vec<String>) {
        let mut warnings = Vec::new();

        let matches: Vec<SimilarityMatch> = matches
            .into_iter()
            .filter(|m| m.similarity >= config.min_similarity)
            .collect();

        let probabilities = prediction.component_probabilities();
        let model_component = probabilities.argmax();
        let probable_component = select_component(&probabilities, &matches);

        let mean_similarity = if matches.is_empty() {
            0.0
        } else {
            matches.iter().map(|m| m.similarity).sum::<f64>() / matches.len() as f64
        };

        let confidence = MODEL_CONFIDENCE_WEIGHT * probabilities.max()
            + SIMILARITY_CONFIDENCE_WEIGHT * mean_similarity;

        let anomaly_tags = anomaly_tags(prediction, &probabilities, config);

        let facts = DiagnosisFacts {
            probable_component,
            model_predicted_component: model_component,
            max_component_probability: probabilities.max(),
            neighbor_count: matches.len(),
            mean_similarity,
            anomaly_tags: anomaly_tags.clone(),
            avg_rul: prediction.avg_rul,
            max_failure_probability: prediction.max_failure_probability,
        };
        let reasoning = self.narrative.diagnosis_reasoning(&facts).await;
        if let Some(warning) = reasoning.warning {
            warnings.push(warning);
        }

        debug!(
            component = %probable_component,
            confidence = confidence,
            neighbors = matches.len(),
            "Diagnosis resolved"
        );

        (
            DiagnosisResult {
                probable_component,
                model_predicted_component: model_component,
                component_probabilities: probabilities,
                similar_cases: matches,
                anomaly_tags,
                reasoning: reasoning.text,
                reasoning_source: reasoning.source,
                confidence,
            },
            warnings,
        )
    }
}

/// Apply the three-step selection policy.
fn select_component(
    probabilities: &ComponentProbabilities,
    matches: &[SimilarityMatch],
) -> ComponentId {
    // 1. High-confidence model override
    if probabilities.max() > MODEL_OVERRIDE_THRESHOLD {
        return probabilities.argmax();
    }

    // 2. Majority vote, each case weighted equally
    let mut tally: HashMap<ComponentId, (usize, f64)> = HashMap::new();
    for m in matches {
        let entry = tally.entry(m.metadata.component).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += m.similarity;
    }

    let mut ranked: Vec<(ComponentId, usize, f64)> = tally
        .into_iter()
        .map(|(component, (count, sum))| (component, count, sum / count as f64))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.cmp(&a.1).then(
            b.2.partial_cmp(&a.2)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });

    match ranked.as_slice() {
        [] => ComponentId::General,
        [winner] => winner.0,
        [first, second, ..] => {
            // A count tie falls through to average similarity; a tie on
            // both signals no usable majority.
            if first.1 == second.1 && (first.2 - second.2).abs() < f64::EPSILON {
                ComponentId::General
            } else {
                first.0
            }
        }
    }
}

/// Threshold-check anomaly heuristics. The thresholds are a configuration
/// surface; the tag vocabulary is stable for downstream consumers.
fn anomaly_tags(
    prediction: &EnsemblePrediction,
    probabilities: &ComponentProbabilities,
    config: &DiagnosisConfig,
) -> Vec<String> {
    let mut tags = Vec::new();

    if prediction.rul_spread() > config.model_disagreement_cycles {
        tags.push("MODEL_DISAGREEMENT".to_string());
    }

    let probs = prediction.failure_probabilities();
    let spread = probs.iter().cloned().fold(f64::MIN, f64::max)
        - probs.iter().cloned().fold(f64::MAX, f64::min);
    if spread > config.probability_spike_spread {
        tags.push("PROBABILITY_SPIKE".to_string());
    }

    if prediction.max_failure_probability > config.high_failure_probability {
        tags.push("HIGH_FAILURE_PROBABILITY".to_string());
    }

    if probabilities.max() < config.low_classifier_confidence {
        tags.push("LOW_CLASSIFIER_CONFIDENCE".to_string());
    }

    tags
}
