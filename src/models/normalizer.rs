//! Per-feature z-score normalization for the classifier family.
//!
//! Statistics are supplied externally as a model artifact (`mean[24]`,
//! `std[24]`) captured at training time. A zero or non-finite std is an
//! artifact defect and is rejected, never silently absorbed.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::types::{Observation, SENSOR_CHANNELS};

/// Training-time normalization statistics for the classifier family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormStats {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl NormStats {
    /// Validate shapes and std values. Called once at artifact load.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.mean.len() != SENSOR_CHANNELS || self.std.len() != SENSOR_CHANNELS {
            return Err(AnalysisError::ModelUnavailable(format!(
                "normalization stats shape mismatch: mean[{}], std[{}], expected [{}]",
                self.mean.len(),
                self.std.len(),
                SENSOR_CHANNELS
            )));
        }
        for (i, &s) in self.std.iter().enumerate() {
            if !s.is_finite() || s == 0.0 {
                return Err(AnalysisError::ModelUnavailable(format!(
                    "normalization std for channel {} is {} — refusing to divide",
                    i, s
                )));
            }
        }
        for (i, &m) in self.mean.iter().enumerate() {
            if !m.is_finite() {
                return Err(AnalysisError::ModelUnavailable(format!(
                    "normalization mean for channel {} is not finite",
                    i
                )));
            }
        }
        Ok(())
    }

    /// Apply `(x - mean) / std` per channel.
    ///
    /// Shapes are checked at load time; the zero-std guard here keeps the
    /// error condition explicit if an unvalidated instance slips through.
    pub fn normalize(&self, observation: &Observation) -> Result<[f64; SENSOR_CHANNELS], AnalysisError> {
        let readings = observation.readings();
        let mut normalized = [0.0_f64; SENSOR_CHANNELS];
        for i in 0..SENSOR_CHANNELS {
            let std = self.std[i];
            if std == 0.0 {
                return Err(AnalysisError::ModelUnavailable(format!(
                    "normalization std for channel {} is zero",
                    i
                )));
            }
            normalized[i] = (readings[i] - self.mean[i]) / std;
        }
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(mean: f64, std: f64) -> NormStats {
        NormStats {
            mean: vec![mean; SENSOR_CHANNELS],
            std: vec![std; SENSOR_CHANNELS],
        }
    }

    #[test]
    fn test_normalize_basic() {
        let norm = stats(10.0, 2.0);
        norm.validate().expect("valid");
        let obs = Observation::from_slice(&[14.0; 24]).expect("valid");
        let z = norm.normalize(&obs).expect("normalizes");
        assert!(z.iter().all(|&v| (v - 2.0).abs() < 1e-12));
    }

    #[test]
    fn test_zero_std_rejected_at_validation() {
        let mut norm = stats(0.0, 1.0);
        norm.std[5] = 0.0;
        assert!(matches!(
            norm.validate(),
            Err(AnalysisError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let norm = NormStats {
            mean: vec![0.0; 23],
            std: vec![1.0; 24],
        };
        assert!(norm.validate().is_err());
    }

    #[test]
    fn test_all_zero_observation_normalizes() {
        // Non-zero std means an all-zero snapshot is a legitimate input.
        let norm = stats(5.0, 2.5);
        let obs = Observation::from_slice(&[0.0; 24]).expect("valid");
        let z = norm.normalize(&obs).expect("normalizes");
        assert!(z.iter().all(|&v| (v + 2.0).abs() < 1e-12));
    }
}
