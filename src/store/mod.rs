//! Case Store / Query Engine
//!
//! Historical failure cases behind one contract with two interchangeable
//! backends: a local embedded store (sled) and a managed vector service
//! (HTTP). Selection is configuration, not logic — the analysis core only
//! ever sees `dyn CaseStore`.
//!
//! Contract:
//! - `add` is an idempotent upsert by id
//! - `query` returns matches sorted by descending similarity in [0, 1],
//!   ties broken by most-recently-added case first; an empty store yields
//!   an empty list, not an error
//! - `delete` is idempotent
//!
//! The `min_similarity` floor is a post-query concern applied by the
//! diagnosis resolver, not a backend guarantee.

mod embedded;
mod remote;

pub use embedded::EmbeddedStore;
pub use remote::RemoteStore;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{StoreBackend, StoreConfig};
use crate::embedding::{embed, Embedding};
use crate::error::AnalysisError;
use crate::types::{
    CaseMetadata, EnsemblePrediction, HistoricalCase, MetadataFilter, Observation,
    SimilarityMatch,
};

/// Storage contract for historical failure cases.
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Idempotent upsert by id.
    async fn add(&self, case: HistoricalCase) -> Result<(), AnalysisError>;

    /// Top-K nearest neighbors by similarity, best first.
    async fn query(
        &self,
        embedding: &Embedding,
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SimilarityMatch>, AnalysisError>;

    /// Idempotent removal by id.
    async fn delete(&self, id: &str) -> Result<(), AnalysisError>;
}

/// Construct the configured backend.
///
/// The core never branches on backend identity after this point.
pub fn build_store(config: &StoreConfig) -> Result<Arc<dyn CaseStore>, AnalysisError> {
    match config.backend {
        StoreBackend::Embedded => Ok(Arc::new(EmbeddedStore::open(&config.path)?)),
        StoreBackend::Remote => Ok(Arc::new(RemoteStore::new(
            &config.remote_url,
            &config.remote_api_key,
            config.remote_timeout_secs,
        )?)),
    }
}

/// Build a historical case from a confirmed failure.
///
/// Invoked by the explicit record-case operation after a failure is
/// confirmed — external to the analysis pipeline. Captures the embedding
/// plus the prediction context at capture time.
pub fn build_case(
    id: &str,
    observation: &Observation,
    prediction: &EnsemblePrediction,
    metadata: CaseMetadata,
) -> HistoricalCase {
    HistoricalCase {
        id: id.to_string(),
        embedding: embed(observation, prediction),
        metadata,
    }
}
