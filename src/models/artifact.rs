//! Model weight artifacts.
//!
//! Each family ships as a JSON weight file produced by the training
//! pipeline (out of scope here). Artifacts are opaque scored predictors:
//! loading validates shapes, scoring applies the stored heads. A missing or
//! shape-mismatched artifact is `ModelUnavailable` — fatal at startup.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AnalysisError;
use crate::types::SENSOR_CHANNELS;

/// One linear head: `bias + weights . x`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearHead {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LinearHead {
    /// Check the head's input width.
    pub fn validate(&self, name: &str) -> Result<(), AnalysisError> {
        if self.weights.len() != SENSOR_CHANNELS {
            return Err(AnalysisError::ModelUnavailable(format!(
                "{} head shape mismatch: {} weights, expected {}",
                name,
                self.weights.len(),
                SENSOR_CHANNELS
            )));
        }
        Ok(())
    }

    /// Raw affine score.
    pub fn score(&self, x: &[f64; SENSOR_CHANNELS]) -> f64 {
        self.bias
            + self
                .weights
                .iter()
                .zip(x.iter())
                .map(|(w, v)| w * v)
                .sum::<f64>()
    }

    /// Logistic-squashed score in (0, 1).
    pub fn score_logistic(&self, x: &[f64; SENSOR_CHANNELS]) -> f64 {
        sigmoid(self.score(x))
    }
}

/// Numerically stable logistic function.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

// ============================================================================
// Per-family artifacts
// ============================================================================

/// Trend family: linear RUL regressor + logistic failure-probability head,
/// scored on raw readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendArtifact {
    pub rul: LinearHead,
    pub probability: LinearHead,
}

impl TrendArtifact {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.rul.validate("trend rul")?;
        self.probability.validate("trend probability")
    }
}

/// Survival family: a health-index head feeding an exponential RUL decay
/// curve, scored on raw readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurvivalArtifact {
    pub health: LinearHead,
    /// RUL at a zero health index (cycles).
    pub max_rul: f64,
    /// Decay rate applied to the health index.
    pub decay: f64,
}

impl SurvivalArtifact {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.health.validate("survival health")?;
        if !self.max_rul.is_finite() || self.max_rul <= 0.0 {
            return Err(AnalysisError::ModelUnavailable(format!(
                "survival max_rul must be positive, got {}",
                self.max_rul
            )));
        }
        if !self.decay.is_finite() || self.decay <= 0.0 {
            return Err(AnalysisError::ModelUnavailable(format!(
                "survival decay must be positive, got {}",
                self.decay
            )));
        }
        Ok(())
    }
}

/// Classifier family: RUL + probability heads plus three independent
/// logistic component heads (healthy, compressor, fan), scored on
/// z-normalized readings. Component head outputs are consumed as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub rul: LinearHead,
    pub probability: LinearHead,
    pub component_healthy: LinearHead,
    pub component_compressor: LinearHead,
    pub component_fan: LinearHead,
}

impl ClassifierArtifact {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.rul.validate("classifier rul")?;
        self.probability.validate("classifier probability")?;
        self.component_healthy.validate("classifier healthy")?;
        self.component_compressor.validate("classifier compressor")?;
        self.component_fan.validate("classifier fan")
    }
}

/// Read and deserialize one artifact file.
pub fn load_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AnalysisError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        AnalysisError::ModelUnavailable(format!(
            "cannot read model artifact {}: {}",
            path.display(),
            e
        ))
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        AnalysisError::ModelUnavailable(format!(
            "corrupt model artifact {}: {}",
            path.display(),
            e
        ))
    })
}
