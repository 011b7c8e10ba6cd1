//! Model Families and Registry
//!
//! Three independently trained predictor families behind one `Predictor`
//! trait:
//!
//! - **Trend**: degradation-trend regressor scored on raw readings
//! - **Survival**: health-index survival estimator scored on raw readings
//! - **Classifier**: multi-head model scored on z-normalized readings,
//!   additionally emitting a component classification
//!
//! Artifacts are loaded exactly once at process startup into a
//! `ModelRegistry` which is injected into the pipeline — no global lookup.
//! Load failure is a loud startup error, not a per-request condition.

mod artifact;
mod normalizer;
pub mod ensemble;

pub use artifact::{
    load_artifact, sigmoid, ClassifierArtifact, LinearHead, SurvivalArtifact, TrendArtifact,
};
pub use ensemble::EnsemblePredictor;
pub use normalizer::NormStats;

use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::error::AnalysisError;
use crate::types::{
    ComponentProbabilities, ModelFamily, ModelPrediction, Observation,
};

/// A loaded, scoreable model family. Implementations are pure and cheap;
/// the ensemble dispatches them on blocking tasks so the three arms run
/// concurrently.
pub trait Predictor: Send + Sync {
    /// Which family this predictor belongs to.
    fn family(&self) -> ModelFamily;

    /// Score one validated observation.
    fn predict(&self, observation: &Observation) -> Result<ModelPrediction, AnalysisError>;
}

// ============================================================================
// Family implementations
// ============================================================================

/// Trend family predictor.
pub struct TrendModel {
    artifact: TrendArtifact,
}

impl Predictor for TrendModel {
    fn family(&self) -> ModelFamily {
        ModelFamily::Trend
    }

    fn predict(&self, observation: &Observation) -> Result<ModelPrediction, AnalysisError> {
        let readings = observation.readings();
        Ok(ModelPrediction {
            rul: self.artifact.rul.score(readings).max(0.0),
            failure_probability: self.artifact.probability.score_logistic(readings),
            predicted_component: None,
            component_probabilities: None,
        })
    }
}

/// Survival family predictor.
pub struct SurvivalModel {
    artifact: SurvivalArtifact,
}

impl Predictor for SurvivalModel {
    fn family(&self) -> ModelFamily {
        ModelFamily::Survival
    }

    fn predict(&self, observation: &Observation) -> Result<ModelPrediction, AnalysisError> {
        let readings = observation.readings();
        // Health index >= 0; softplus keeps the decay curve well-defined
        // for arbitrary head outputs.
        let raw = self.artifact.health.score(readings);
        let health = softplus(raw);
        let rul = (self.artifact.max_rul * (-self.artifact.decay * health).exp()).max(0.0);
        let failure_probability = (1.0 - (-health).exp()).clamp(0.0, 1.0);
        Ok(ModelPrediction {
            rul,
            failure_probability,
            predicted_component: None,
            component_probabilities: None,
        })
    }
}

/// Classifier family predictor. Applies z-score normalization with the
/// training-time statistics before scoring; a zero std in those statistics
/// is an error condition, not silently absorbed.
pub struct ClassifierModel {
    artifact: ClassifierArtifact,
    norm_stats: NormStats,
}

impl Predictor for ClassifierModel {
    fn family(&self) -> ModelFamily {
        ModelFamily::Classifier
    }

    fn predict(&self, observation: &Observation) -> Result<ModelPrediction, AnalysisError> {
        let z = self.norm_stats.normalize(observation)?;
        let probabilities = ComponentProbabilities::new(
            self.artifact.component_healthy.score_logistic(&z),
            self.artifact.component_compressor.score_logistic(&z),
            self.artifact.component_fan.score_logistic(&z),
        );
        Ok(ModelPrediction {
            rul: self.artifact.rul.score(&z).max(0.0),
            failure_probability: self.artifact.probability.score_logistic(&z),
            predicted_component: Some(probabilities.argmax()),
            component_probabilities: Some(probabilities),
        })
    }
}

fn softplus(z: f64) -> f64 {
    // ln(1 + e^z), stable for large |z|
    if z > 30.0 {
        z
    } else {
        z.exp().ln_1p()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// The three loaded families. Built once at startup and shared read-only
/// across all requests.
pub struct ModelRegistry {
    pub trend: Arc<dyn Predictor>,
    pub survival: Arc<dyn Predictor>,
    pub classifier: Arc<dyn Predictor>,
}

impl ModelRegistry {
    /// Load all three families from an artifact directory.
    ///
    /// Expects `trend.json`, `survival.json`, `classifier.json` and
    /// `norm_stats.json`. Any missing or malformed artifact fails the load;
    /// partial registries are never produced.
    pub fn load(artifact_dir: &Path) -> Result<Self, AnalysisError> {
        let trend: TrendArtifact = load_artifact(&artifact_dir.join("trend.json"))?;
        trend.validate()?;

        let survival: SurvivalArtifact = load_artifact(&artifact_dir.join("survival.json"))?;
        survival.validate()?;

        let classifier: ClassifierArtifact =
            load_artifact(&artifact_dir.join("classifier.json"))?;
        classifier.validate()?;

        let norm_stats: NormStats = load_artifact(&artifact_dir.join("norm_stats.json"))?;
        norm_stats.validate()?;

        info!(
            dir = %artifact_dir.display(),
            "Model registry loaded: trend, survival, classifier"
        );

        Ok(Self {
            trend: Arc::new(TrendModel { artifact: trend }),
            survival: Arc::new(SurvivalModel { artifact: survival }),
            classifier: Arc::new(ClassifierModel {
                artifact: classifier,
                norm_stats,
            }),
        })
    }

    /// Assemble a registry from pre-built predictors. Test seam; also used
    /// when a caller owns artifact loading.
    pub fn from_parts(
        trend: Arc<dyn Predictor>,
        survival: Arc<dyn Predictor>,
        classifier: Arc<dyn Predictor>,
    ) -> Self {
        Self {
            trend,
            survival,
            classifier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SENSOR_CHANNELS;

    fn head(w: f64, bias: f64) -> LinearHead {
        LinearHead {
            weights: vec![w; SENSOR_CHANNELS],
            bias,
        }
    }

    fn observation(value: f64) -> Observation {
        Observation::from_slice(&[value; SENSOR_CHANNELS]).expect("valid")
    }

    #[test]
    fn test_trend_model_clamps_rul() {
        let model = TrendModel {
            artifact: TrendArtifact {
                rul: head(-10.0, 0.0),
                probability: head(0.0, 0.0),
            },
        };
        let prediction = model.predict(&observation(5.0)).expect("predicts");
        assert_eq!(prediction.rul, 0.0);
        assert!((prediction.failure_probability - 0.5).abs() < 1e-12);
        assert!(prediction.component_probabilities.is_none());
    }

    #[test]
    fn test_survival_model_decay() {
        let model = SurvivalModel {
            artifact: SurvivalArtifact {
                health: head(0.0, -50.0), // softplus(-50) ~ 0: healthy
                max_rul: 150.0,
                decay: 0.5,
            },
        };
        let prediction = model.predict(&observation(1.0)).expect("predicts");
        assert!((prediction.rul - 150.0).abs() < 1e-6);
        assert!(prediction.failure_probability < 1e-6);
    }

    #[test]
    fn test_classifier_emits_components() {
        let model = ClassifierModel {
            artifact: ClassifierArtifact {
                rul: head(1.0, 50.0),
                probability: head(0.0, -1.0),
                component_healthy: head(0.0, -2.0),
                component_compressor: head(0.0, 2.0),
                component_fan: head(0.0, -2.0),
            },
            norm_stats: NormStats {
                mean: vec![0.0; SENSOR_CHANNELS],
                std: vec![1.0; SENSOR_CHANNELS],
            },
        };
        let prediction = model.predict(&observation(0.0)).expect("predicts");
        let probs = prediction.component_probabilities.expect("present");
        assert_eq!(
            prediction.predicted_component,
            Some(crate::types::ComponentId::CompressorDegradation)
        );
        assert!(probs.compressor_degradation > 0.8);
    }

    #[test]
    fn test_classifier_surfaces_zero_std() {
        let model = ClassifierModel {
            artifact: ClassifierArtifact {
                rul: head(0.0, 0.0),
                probability: head(0.0, 0.0),
                component_healthy: head(0.0, 0.0),
                component_compressor: head(0.0, 0.0),
                component_fan: head(0.0, 0.0),
            },
            norm_stats: NormStats {
                mean: vec![0.0; SENSOR_CHANNELS],
                std: vec![0.0; SENSOR_CHANNELS],
            },
        };
        assert!(matches!(
            model.predict(&observation(1.0)),
            Err(AnalysisError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_registry_load_missing_dir_fails() {
        let err = ModelRegistry::load(Path::new("/nonexistent/models"))
            .err()
            .expect("fails");
        assert!(matches!(err, AnalysisError::ModelUnavailable(_)));
    }
}
