//! Model prediction types: per-family outputs and the fused ensemble.

use serde::{Deserialize, Serialize};
use tracing::warn;

// ============================================================================
// Model Families
// ============================================================================

/// The three independently trained predictor families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    /// Degradation-trend regressor scored on raw readings.
    Trend,
    /// Health-index survival estimator scored on raw readings.
    Survival,
    /// Multi-head classifier scored on z-normalized readings; additionally
    /// emits a discrete component classification.
    Classifier,
}

impl std::fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelFamily::Trend => write!(f, "Trend"),
            ModelFamily::Survival => write!(f, "Survival"),
            ModelFamily::Classifier => write!(f, "Classifier"),
        }
    }
}

// ============================================================================
// Components
// ============================================================================

/// Engine component implicated by diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentId {
    Healthy,
    CompressorDegradation,
    FanDegradation,
    /// Low-certainty fallback when neither the classifier nor neighbor
    /// evidence points at a specific component.
    General,
}

impl ComponentId {
    /// Human-readable label for reports and action templates.
    pub fn label(&self) -> &'static str {
        match self {
            ComponentId::Healthy => "Healthy",
            ComponentId::CompressorDegradation => "Compressor",
            ComponentId::FanDegradation => "Fan",
            ComponentId::General => "General",
        }
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Per-component probability triple from the classifier family.
///
/// Values are taken as-is from the classifier heads; no renormalization is
/// performed, even when the triple does not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentProbabilities {
    pub healthy: f64,
    pub compressor_degradation: f64,
    pub fan_degradation: f64,
}

impl ComponentProbabilities {
    /// Maximum tolerated deviation of the triple's sum from 1.0 before a
    /// warning is logged. The values themselves are never altered.
    const SUM_TOLERANCE: f64 = 0.05;

    /// Build a triple, logging when the sum drifts from 1.0.
    pub fn new(healthy: f64, compressor_degradation: f64, fan_degradation: f64) -> Self {
        let sum = healthy + compressor_degradation + fan_degradation;
        if (sum - 1.0).abs() > Self::SUM_TOLERANCE {
            warn!(
                sum = sum,
                "Component probability triple does not sum to 1 — consumed as-is"
            );
        }
        Self {
            healthy,
            compressor_degradation,
            fan_degradation,
        }
    }

    /// Highest probability in the triple.
    pub fn max(&self) -> f64 {
        self.healthy
            .max(self.compressor_degradation)
            .max(self.fan_degradation)
    }

    /// Component with the highest probability.
    pub fn argmax(&self) -> ComponentId {
        let mut best = (ComponentId::Healthy, self.healthy);
        if self.compressor_degradation > best.1 {
            best = (ComponentId::CompressorDegradation, self.compressor_degradation);
        }
        if self.fan_degradation > best.1 {
            best = (ComponentId::FanDegradation, self.fan_degradation);
        }
        best.0
    }

    /// Fixed 3-way split for the embedding's prediction half.
    pub fn as_triple(&self) -> [f64; 3] {
        [
            self.healthy,
            self.compressor_degradation,
            self.fan_degradation,
        ]
    }
}

// ============================================================================
// Predictions
// ============================================================================

/// Output of one model family for one observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPrediction {
    /// Remaining useful life in cycles (>= 0).
    pub rul: f64,
    /// Failure probability in [0, 1].
    pub failure_probability: f64,
    /// Discrete component classification (classifier family only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_component: Option<ComponentId>,
    /// Per-component probabilities (classifier family only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_probabilities: Option<ComponentProbabilities>,
}

/// Fused output of the three families. Computed once per request and
/// immutable after creation; owned exclusively by that request's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsemblePrediction {
    pub trend: ModelPrediction,
    pub survival: ModelPrediction,
    pub classifier: ModelPrediction,
    /// Arithmetic mean of the three per-family RULs. Unweighted on purpose;
    /// downstream consumers depend on the exact formula.
    pub avg_rul: f64,
    /// Maximum of the three per-family failure probabilities.
    pub max_failure_probability: f64,
}

impl EnsemblePrediction {
    /// Fuse three per-family predictions.
    ///
    /// `avg_rul = (rul_trend + rul_survival + rul_classifier) / 3`,
    /// `max_failure_probability = max(prob_trend, prob_survival, prob_classifier)`.
    pub fn fuse(
        trend: ModelPrediction,
        survival: ModelPrediction,
        classifier: ModelPrediction,
    ) -> Self {
        let avg_rul = (trend.rul + survival.rul + classifier.rul) / 3.0;
        let max_failure_probability = trend
            .failure_probability
            .max(survival.failure_probability)
            .max(classifier.failure_probability);
        Self {
            trend,
            survival,
            classifier,
            avg_rul,
            max_failure_probability,
        }
    }

    /// Per-family RULs in fixed (trend, survival, classifier) order.
    pub fn ruls(&self) -> [f64; 3] {
        [self.trend.rul, self.survival.rul, self.classifier.rul]
    }

    /// Per-family failure probabilities in fixed order.
    pub fn failure_probabilities(&self) -> [f64; 3] {
        [
            self.trend.failure_probability,
            self.survival.failure_probability,
            self.classifier.failure_probability,
        ]
    }

    /// Spread between the highest and lowest per-family RUL (cycles).
    pub fn rul_spread(&self) -> f64 {
        let ruls = self.ruls();
        let max = ruls.iter().cloned().fold(f64::MIN, f64::max);
        let min = ruls.iter().cloned().fold(f64::MAX, f64::min);
        max - min
    }

    /// Classifier component probabilities, zeroed triple when absent.
    pub fn component_probabilities(&self) -> ComponentProbabilities {
        self.classifier
            .component_probabilities
            .unwrap_or(ComponentProbabilities {
                healthy: 0.0,
                compressor_degradation: 0.0,
                fan_degradation: 0.0,
            })
    }
}
