//! Narrative Generation Module
//!
//! Boundary to the external text-generation collaborator. The contract is
//! `generate(structured facts) -> text` with a bounded timeout; on timeout
//! or unavailability the deterministic templates in [`templates`] are used
//! instead, and the request never fails because of narrative generation.

pub mod templates;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::error::AnalysisError;
use crate::types::{
    ComponentId, MaintenanceWindow, NarrativeSource, RiskLevel,
};

/// Unified trait for narrative backends.
#[async_trait]
pub trait NarrativeBackend: Send + Sync {
    /// Generate narrative text from structured facts.
    async fn generate(&self, facts: &serde_json::Value) -> anyhow::Result<String>;

    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;
}

// ============================================================================
// Structured Facts
// ============================================================================

/// Facts handed to the collaborator for diagnosis reasoning.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisFacts {
    pub probable_component: ComponentId,
    pub model_predicted_component: ComponentId,
    pub max_component_probability: f64,
    pub neighbor_count: usize,
    pub mean_similarity: f64,
    pub anomaly_tags: Vec<String>,
    pub avg_rul: f64,
    pub max_failure_probability: f64,
}

/// Facts handed to the collaborator for the final report narrative.
#[derive(Debug, Clone, Serialize)]
pub struct ReportFacts {
    pub probable_component: ComponentId,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub avg_rul: f64,
    pub max_failure_probability: f64,
    pub window: MaintenanceWindow,
    pub diagnosis_confidence: f64,
    pub maintenance_overdue: bool,
}

/// Outcome of one narrative request.
#[derive(Debug, Clone)]
pub struct NarrativeOutcome {
    pub text: String,
    pub source: NarrativeSource,
    /// Warning recorded when the collaborator was skipped or failed.
    pub warning: Option<String>,
}

// ============================================================================
// Engine
// ============================================================================

/// Wraps an optional backend with the timeout/fallback policy.
pub struct NarrativeEngine {
    backend: Option<Arc<dyn NarrativeBackend>>,
    timeout: Duration,
}

impl NarrativeEngine {
    pub fn new(backend: Option<Arc<dyn NarrativeBackend>>, timeout_ms: u64) -> Self {
        Self {
            backend,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Engine that always uses the deterministic templates.
    pub fn template_only() -> Self {
        Self {
            backend: None,
            timeout: Duration::from_millis(0),
        }
    }

    /// Diagnosis reasoning text with fallback.
    pub async fn diagnosis_reasoning(&self, facts: &DiagnosisFacts) -> NarrativeOutcome {
        self.generate_or_fallback(
            serde_json::json!({ "kind": "diagnosis", "facts": facts }),
            || templates::diagnosis_reasoning(facts),
        )
        .await
    }

    /// Report narrative text with fallback.
    pub async fn report_narrative(&self, facts: &ReportFacts) -> NarrativeOutcome {
        self.generate_or_fallback(
            serde_json::json!({ "kind": "report", "facts": facts }),
            || templates::report_narrative(facts),
        )
        .await
    }

    async fn generate_or_fallback<F>(
        &self,
        facts: serde_json::Value,
        fallback: F,
    ) -> NarrativeOutcome
    where
        F: FnOnce() -> String,
    {
        let Some(backend) = &self.backend else {
            return NarrativeOutcome {
                text: fallback(),
                source: NarrativeSource::Template,
                warning: None,
            };
        };

        match tokio::time::timeout(self.timeout, backend.generate(&facts)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => NarrativeOutcome {
                text,
                source: NarrativeSource::Service,
                warning: None,
            },
            Ok(Ok(_)) => {
                warn!(backend = backend.backend_name(), "Narrative backend returned empty text — using template");
                NarrativeOutcome {
                    text: fallback(),
                    source: NarrativeSource::Template,
                    warning: Some("narrative backend returned empty text".to_string()),
                }
            }
            Ok(Err(e)) => {
                warn!(backend = backend.backend_name(), error = %e, "Narrative backend failed — using template");
                NarrativeOutcome {
                    text: fallback(),
                    source: NarrativeSource::Template,
                    warning: Some(format!("narrative backend failed: {}", e)),
                }
            }
            Err(_) => {
                let timeout = AnalysisError::GenerationTimeout(self.timeout.as_millis() as u64);
                warn!(backend = backend.backend_name(), "{timeout} — using template");
                NarrativeOutcome {
                    text: fallback(),
                    source: NarrativeSource::Template,
                    warning: Some(timeout.to_string()),
                }
            }
        }
    }
}

// ============================================================================
// HTTP backend
// ============================================================================

/// HTTP client backend for the hosted generation service.
pub struct HttpNarrativeBackend {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpNarrativeBackend {
    pub fn new(url: &str, api_key: &str) -> anyhow::Result<Self> {
        anyhow::ensure!(!url.is_empty(), "narrative backend enabled but no url configured");
        Ok(Self {
            http: reqwest::Client::new(),
            url: url.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl NarrativeBackend for HttpNarrativeBackend {
    async fn generate(&self, facts: &serde_json::Value) -> anyhow::Result<String> {
        let resp = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(facts)
            .send()
            .await?;

        anyhow::ensure!(
            resp.status().is_success(),
            "generation service returned status {}",
            resp.status()
        );

        #[derive(serde::Deserialize)]
        struct GenerateResponse {
            text: String,
        }
        let parsed: GenerateResponse = resp.json().await?;
        Ok(parsed.text)
    }

    fn backend_name(&self) -> &'static str {
        "http-generation-service"
    }
}
