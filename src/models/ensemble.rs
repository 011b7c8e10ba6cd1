//! Ensemble Predictor
//!
//! Dispatches the three model families concurrently over the same
//! observation and fuses their outputs with the fixed rule:
//! `avg_rul = mean(rul_i)`, `max_failure_probability = max(prob_i)`.
//!
//! If any family fails (missing artifact, shape mismatch) the whole stage
//! fails — partial ensembles are never produced, since downstream risk
//! scoring assumes all three arms are present.

use std::sync::Arc;
use tracing::debug;

use super::{ModelRegistry, Predictor};
use crate::error::AnalysisError;
use crate::types::{EnsemblePrediction, ModelPrediction, Observation};

/// Runs the three families and fuses their predictions.
pub struct EnsemblePredictor {
    registry: Arc<ModelRegistry>,
}

impl EnsemblePredictor {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    /// Predict over one observation.
    ///
    /// The three arms are independent of each other and are dispatched on
    /// blocking tasks, joined before fusion.
    pub async fn predict(
        &self,
        observation: &Observation,
    ) -> Result<EnsemblePrediction, AnalysisError> {
        let trend = dispatch(Arc::clone(&self.registry.trend), observation.clone());
        let survival = dispatch(Arc::clone(&self.registry.survival), observation.clone());
        let classifier = dispatch(Arc::clone(&self.registry.classifier), observation.clone());

        let (trend, survival, classifier) = tokio::try_join!(trend, survival, classifier)?;

        let fused = EnsemblePrediction::fuse(trend, survival, classifier);
        debug!(
            avg_rul = fused.avg_rul,
            max_failure_probability = fused.max_failure_probability,
            "Ensemble fusion complete"
        );
        Ok(fused)
    }
}

/// Run one family on a blocking task.
async fn dispatch(
    model: Arc<dyn Predictor>,
    observation: Observation,
) -> Result<ModelPrediction, AnalysisError> {
    let family = model.family();
    tokio::task::spawn_blocking(move || model.predict(&observation))
        .await
        .map_err(|e| {
            AnalysisError::ModelUnavailable(format!("{} prediction task failed: {}", family, e))
        })?
}
