//! Managed vector-service case store.
//!
//! HTTP client for a hosted vector store. The service ranks by similarity
//! and already reports scores in [0, 1], so values are used directly —
//! no cosine mapping is applied on this path.
//!
//! Any transport or server failure surfaces as `StoreUnavailable`; the
//! diagnosis stage degrades rather than failing the request.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::CaseStore;
use crate::embedding::Embedding;
use crate::error::AnalysisError;
use crate::types::{HistoricalCase, MetadataFilter, SimilarityMatch};

/// HTTP client for the managed case store.
pub struct RemoteStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Query response row from the service.
#[derive(Debug, Deserialize)]
struct RemoteMatch {
    case_id: String,
    /// Already in [0, 1].
    similarity: f64,
    metadata: crate::types::CaseMetadata,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    matches: Vec<RemoteMatch>,
}

impl RemoteStore {
    /// Build a client for the given service endpoint.
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, AnalysisError> {
        if base_url.is_empty() {
            return Err(AnalysisError::StoreUnavailable(
                "remote store selected but no remote_url configured".to_string(),
            ));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                AnalysisError::StoreUnavailable(format!("cannot build HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn transport(e: reqwest::Error) -> AnalysisError {
        AnalysisError::StoreUnavailable(format!("remote store request failed: {}", e))
    }

    fn status(status: reqwest::StatusCode) -> AnalysisError {
        AnalysisError::StoreUnavailable(format!("remote store returned status {}", status))
    }
}

#[async_trait]
impl CaseStore for RemoteStore {
    async fn add(&self, case: HistoricalCase) -> Result<(), AnalysisError> {
        let resp = self
            .http
            .put(format!("{}/cases/{}", self.base_url, case.id))
            .bearer_auth(&self.api_key)
            .json(&case)
            .send()
            .await
            .map_err(Self::transport)?;

        if !resp.status().is_success() {
            return Err(Self::status(resp.status()));
        }
        debug!(id = %case.id, "Case upserted to remote store");
        Ok(())
    }

    async fn query(
        &self,
        embedding: &Embedding,
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SimilarityMatch>, AnalysisError> {
        let body = serde_json::json!({
            "embedding": embedding.as_slice(),
            "top_k": top_k,
            "filter": filter,
        });

        let resp = self
            .http
            .post(format!("{}/cases/query", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(Self::transport)?;

        if !resp.status().is_success() {
            return Err(Self::status(resp.status()));
        }

        let parsed: QueryResponse = resp.json().await.map_err(Self::transport)?;

        // The service ranks ties by recency; re-sort defensively on the
        // reported similarity alone so ordering is monotone regardless.
        let mut matches: Vec<SimilarityMatch> = parsed
            .matches
            .into_iter()
            .map(|m| SimilarityMatch {
                case_id: m.case_id,
                similarity: m.similarity.clamp(0.0, 1.0),
                metadata: m.metadata,
            })
            .collect();
        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn delete(&self, id: &str) -> Result<(), AnalysisError> {
        let resp = self
            .http
            .delete(format!("{}/cases/{}", self.base_url, id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(Self::transport)?;

        // 404 is an idempotent no-op, not an error.
        if !resp.status().is_success() && resp.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(Self::status(resp.status()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_url_rejected_at_construction() {
        assert!(matches!(
            RemoteStore::new("", "key", 10),
            Err(AnalysisError::StoreUnavailable(_))
        ));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let store = RemoteStore::new("https://vectors.example.com/", "key", 10).expect("builds");
        assert_eq!(store.base_url, "https://vectors.example.com");
    }
}
