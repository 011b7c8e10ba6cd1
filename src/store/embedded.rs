//! Embedded case store.
//!
//! Sled-persisted cases with an in-memory index scanned with cosine
//! similarity. Concurrent reads share the index read lock; writes take the
//! write lock and hit sled before becoming visible, so an `add` that has
//! returned is visible to every subsequent query.
//!
//! Key: case id bytes. Value: JSON `StoredCase` (case + insertion sequence)
//! — the sequence drives the most-recently-added tie-break and survives
//! restarts.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use async_trait::async_trait;

use super::CaseStore;
use crate::embedding::{cosine_to_similarity, Embedding};
use crate::error::AnalysisError;
use crate::types::{HistoricalCase, MetadataFilter, SimilarityMatch};

/// On-disk representation: the case plus its insertion sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCase {
    case: HistoricalCase,
    seq: u64,
}

/// Local sled-backed case store.
pub struct EmbeddedStore {
    db: sled::Db,
    index: Arc<RwLock<Vec<StoredCase>>>,
    next_seq: AtomicU64,
}

impl EmbeddedStore {
    /// Open or create the store at the given directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AnalysisError> {
        let db = sled::open(path.as_ref()).map_err(|e| {
            AnalysisError::StoreUnavailable(format!(
                "cannot open case store at {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let mut index = Vec::new();
        let mut max_seq = 0_u64;
        for item in db.iter() {
            let (_key, value) = item.map_err(|e| {
                AnalysisError::StoreUnavailable(format!("case store iteration failed: {}", e))
            })?;
            match serde_json::from_slice::<StoredCase>(&value) {
                Ok(stored) => {
                    max_seq = max_seq.max(stored.seq);
                    index.push(stored);
                }
                Err(e) => {
                    // Skip unreadable records rather than refusing to open.
                    warn!(error = %e, "Skipping corrupt case record");
                }
            }
        }

        info!(cases = index.len(), "Embedded case store opened");

        Ok(Self {
            db,
            index: Arc::new(RwLock::new(index)),
            next_seq: AtomicU64::new(max_seq + 1),
        })
    }

    /// Number of stored cases.
    pub fn len(&self) -> usize {
        self.index.read().map(|idx| idx.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> AnalysisError {
        AnalysisError::StoreUnavailable("case index lock poisoned".to_string())
    }
}

#[async_trait]
impl CaseStore for EmbeddedStore {
    async fn add(&self, case: HistoricalCase) -> Result<(), AnalysisError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let stored = StoredCase { case, seq };

        let value = serde_json::to_vec(&stored).map_err(|e| {
            AnalysisError::StoreUnavailable(format!("case serialization failed: {}", e))
        })?;

        let mut index = self.index.write().map_err(|_| Self::poisoned())?;
        self.db
            .insert(stored.case.id.as_bytes(), value)
            .map_err(|e| {
                AnalysisError::StoreUnavailable(format!("case store write failed: {}", e))
            })?;

        // Upsert: drop any previous record with the same id, then append
        // with the fresh sequence.
        index.retain(|existing| existing.case.id != stored.case.id);
        index.push(stored);
        Ok(())
    }

    async fn query(
        &self,
        embedding: &Embedding,
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SimilarityMatch>, AnalysisError> {
        let index = self.index.read().map_err(|_| Self::poisoned())?;

        let mut scored: Vec<(f64, u64, &StoredCase)> = index
            .iter()
            .filter(|stored| {
                filter
                    .map(|f| f.matches(&stored.case.metadata))
                    .unwrap_or(true)
            })
            .map(|stored| {
                // Sled reports raw cosine; map [-1, 1] -> [0, 1].
                let similarity = cosine_to_similarity(embedding.cosine(&stored.case.embedding));
                (similarity, stored.seq, stored)
            })
            .collect();

        // Descending similarity, ties to the most recently added case.
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.1.cmp(&a.1))
        });

        let matches = scored
            .into_iter()
            .take(top_k)
            .map(|(similarity, _seq, stored)| SimilarityMatch {
                case_id: stored.case.id.clone(),
                similarity,
                metadata: stored.case.metadata.clone(),
            })
            .collect();

        Ok(matches)
    }

    async fn delete(&self, id: &str) -> Result<(), AnalysisError> {
        let mut index = self.index.write().map_err(|_| Self::poisoned())?;
        self.db.remove(id.as_bytes()).map_err(|e| {
            AnalysisError::StoreUnavailable(format!("case store delete failed: {}", e))
        })?;
        let before = index.len();
        index.retain(|stored| stored.case.id != id);
        debug!(id = id, removed = before != index.len(), "Case delete");
        Ok(())
    }
}
