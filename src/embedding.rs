//! Failure Embedder
//!
//! Pure function `(observation, ensemble prediction) -> unit vector[128]`
//! used for similarity search over the historical case store.
//!
//! Layout is a fixed-width contract:
//! - Observation half (dims 0-63): 8 summary statistics over the 24 raw
//!   readings, then the 24 raw readings, zero-padded to 64.
//! - Prediction half (dims 64-127): scaled ensemble RUL, ensemble failure
//!   probability, three per-model RULs (scaled), three per-model failure
//!   probabilities, the 3-way component probability triple, zero-filled
//!   to 64.
//!
//! The concatenated vector is L2-normalized. A degenerate all-zero input
//! skips normalization and returns the zero vector rather than dividing
//! by zero.

use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution, Max, Min, OrderStatistics};

use crate::types::{EnsemblePrediction, Observation};

/// Total embedding dimensionality.
pub const EMBEDDING_DIM: usize = 128;

/// Width of each conceptual half.
pub const HALF_DIM: usize = 64;

/// RUL values are divided by this before entering the vector so a raw
/// cycle count cannot dominate the L2 norm.
const RUL_SCALE: f64 = 100.0;

/// A 128-dimensional unit vector (or the documented zero vector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding(Vec<f64>);

impl Embedding {
    /// Wrap a raw vector, checking dimensionality. Used when rehydrating
    /// stored cases; freshly computed embeddings come from [`embed`].
    pub fn from_vec(values: Vec<f64>) -> Option<Self> {
        (values.len() == EMBEDDING_DIM).then_some(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.0.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Cosine similarity in [-1, 1]. Zero vectors yield 0.
    pub fn cosine(&self, other: &Self) -> f64 {
        let dot: f64 = self
            .0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a * b)
            .sum();
        let norms = self.norm() * other.norm();
        if norms <= f64::EPSILON {
            return 0.0;
        }
        dot / norms
    }
}

/// Map a raw cosine value in [-1, 1] to a similarity in [0, 1].
pub fn cosine_to_similarity(cosine: f64) -> f64 {
    ((cosine + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Compute the failure embedding for an observation and its fused prediction.
pub fn embed(observation: &Observation, prediction: &EnsemblePrediction) -> Embedding {
    let mut values = Vec::with_capacity(EMBEDDING_DIM);

    values.extend_from_slice(&observation_half(observation));
    values.extend_from_slice(&prediction_half(prediction));

    let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > f64::EPSILON {
        for v in &mut values {
            *v /= norm;
        }
    }

    Embedding(values)
}

/// Summary statistics + raw readings, zero-padded to 64 dims.
fn observation_half(observation: &Observation) -> [f64; HALF_DIM] {
    let readings = observation.readings();
    let mut data = Data::new(readings.to_vec());

    let mut half = [0.0_f64; HALF_DIM];
    half[0] = data.mean().unwrap_or(0.0);
    half[1] = data.std_dev().unwrap_or(0.0);
    half[2] = data.min();
    half[3] = data.max();
    half[4] = data.median();
    half[5] = data.percentile(25);
    half[6] = data.percentile(75);
    half[7] = data.percentile(90);

    half[8..8 + readings.len()].copy_from_slice(readings);
    // Remaining slots stay zero: reserved extended/normalized channels.
    half
}

/// Ensemble + per-model values + component triple, zero-filled to 64 dims.
fn prediction_half(prediction: &EnsemblePrediction) -> [f64; HALF_DIM] {
    let mut half = [0.0_f64; HALF_DIM];
    half[0] = prediction.avg_rul / RUL_SCALE;
    half[1] = prediction.max_failure_probability;

    let ruls = prediction.ruls();
    for (i, rul) in ruls.iter().enumerate() {
        half[2 + i] = rul / RUL_SCALE;
    }

    let probs = prediction.failure_probabilities();
    half[5..8].copy_from_slice(&probs);

    let triple = prediction.component_probabilities().as_triple();
    half[8..11].copy_from_slice(&triple);

    half
}
