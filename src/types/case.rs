//! Historical failure cases and similarity query results.

use serde::{Deserialize, Serialize};

use super::ComponentId;
use crate::embedding::Embedding;

/// Metadata captured alongside a confirmed failure case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseMetadata {
    /// Component that actually failed.
    pub component: ComponentId,
    /// Failure mode label (e.g. "hpc-efficiency-loss").
    pub failure_type: String,
    /// Operator-assigned severity label at capture time.
    pub severity: String,
    /// Ensemble RUL at the time the case was captured.
    pub rul_at_capture: f64,
    /// Ensemble failure probability at capture time.
    pub failure_probability_at_capture: f64,
}

/// A stored failure record used as diagnostic precedent.
///
/// Created by the explicit record-case operation after a confirmed failure;
/// never mutated in place, only added or removed by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalCase {
    pub id: String,
    pub embedding: Embedding,
    pub metadata: CaseMetadata,
}

/// One nearest-neighbor query result. Ephemeral, recomputed per query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityMatch {
    /// Id of the matched historical case.
    pub case_id: String,
    /// Similarity score in [0, 1].
    pub similarity: f64,
    /// Metadata of the matched case.
    pub metadata: CaseMetadata,
}

/// Optional metadata constraints applied by the store during a query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataFilter {
    /// Restrict matches to this component.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentId>,
    /// Restrict matches to this failure type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_type: Option<String>,
}

impl MetadataFilter {
    /// Whether a case's metadata satisfies every set constraint.
    pub fn matches(&self, metadata: &CaseMetadata) -> bool {
        if let Some(component) = self.component {
            if metadata.component != component {
                return false;
            }
        }
        if let Some(failure_type) = &self.failure_type {
            if &metadata.failure_type != failure_type {
                return false;
            }
        }
        true
    }
}
