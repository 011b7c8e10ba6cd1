//! Pipeline Orchestrator
//!
//! Threads one `AnalysisState` through the five stages in fixed order,
//! short-circuiting to `FAILED` on a fatal error. The orchestrator never
//! raises past its boundary: it always returns the (possibly partial)
//! state so the caller can serialize some response.
//!
//! A store outage is not fatal — the diagnosis stage degrades to
//! model-only confidence with a recorded warning. Narrative failures are
//! absorbed inside the resolver and aggregator via the template fallback.

use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::state::{AnalysisState, PipelineStage};
use crate::config;
use crate::diagnosis::DiagnosisResolver;
use crate::embedding;
use crate::error::AnalysisError;
use crate::models::{EnsemblePredictor, ModelRegistry};
use crate::narrative::NarrativeEngine;
use crate::risk;
use crate::schedule;
use crate::store::CaseStore;
use crate::types::Observation;
use crate::report;

/// The analysis pipeline. Holds the shared read-mostly resources (loaded
/// models, case store, narrative engine); everything per-request lives in
/// the `AnalysisState` it returns.
pub struct AnalysisPipeline {
    ensemble: EnsemblePredictor,
    store: Arc<dyn CaseStore>,
    resolver: DiagnosisResolver,
    narrative: Arc<NarrativeEngine>,
}

impl AnalysisPipeline {
    /// Wire the pipeline from startup-initialized resources.
    pub fn new(
        registry: Arc<ModelRegistry>,
        store: Arc<dyn CaseStore>,
        narrative: Arc<NarrativeEngine>,
    ) -> Self {
        Self {
            ensemble: EnsemblePredictor::new(registry),
            store,
            resolver: DiagnosisResolver::new(Arc::clone(&narrative)),
            narrative,
        }
    }

    /// Run one observation through the state machine.
    ///
    /// The cancellation token is checked between stages; cancellation
    /// short-circuits to `FAILED` like any other fatal error.
    pub async fn run(
        &self,
        observation: Observation,
        cancel: CancellationToken,
    ) -> AnalysisState {
        let cfg = config::get();
        let mut state = AnalysisState::new(observation);

        // Stage: ensemble prediction
        if cancelled(&cancel, &mut state) {
            return state;
        }
        let prediction = match self.ensemble.predict(state.observation()).await {
            Ok(prediction) => prediction,
            Err(e) => {
                warn!(error = %e, "Ensemble prediction failed — aborting request");
                state.fail(e);
                return state;
            }
        };
        state.prediction = Some(prediction.clone());
        state.advance(PipelineStage::Predicted);

        // Stage: diagnosis (embed, retrieve neighbors, resolve)
        if cancelled(&cancel, &mut state) {
            return state;
        }
        let query_embedding = embedding::embed(state.observation(), &prediction);
        let matches = match self
            .store
            .query(&query_embedding, cfg.diagnosis.top_k, None)
            .await
        {
            Ok(matches) => matches,
            Err(AnalysisError::StoreUnavailable(detail)) => {
                warn!(detail = %detail, "Case store unavailable — degrading to model-only diagnosis");
                state
                    .warnings
                    .push(format!("case store unavailable: {} — diagnosis is model-only", detail));
                Vec::new()
            }
            Err(e) => {
                state.fail(e);
                return state;
            }
        };
        let (diagnosis, diagnosis_warnings) = self
            .resolver
            .resolve(&prediction, matches, &cfg.diagnosis)
            .await;
        state.warnings.extend(diagnosis_warnings);
        state.diagnosis = Some(diagnosis.clone());
        state.advance(PipelineStage::Diagnosed);

        // Stage: risk scoring
        if cancelled(&cancel, &mut state) {
            return state;
        }
        let risk_assessment = risk::assess(&prediction, &cfg.risk);
        state.risk_assessment = Some(risk_assessment.clone());
        state.advance(PipelineStage::RiskScored);

        // Stage: scheduling
        if cancelled(&cancel, &mut state) {
            return state;
        }
        let now = Utc::now();
        let planned = schedule::plan(
            &risk_assessment,
            &diagnosis,
            prediction.avg_rul,
            now,
            &cfg.scheduling,
        );
        state.warnings.extend(planned.warnings);
        state.maintenance_schedule = Some(planned.schedule.clone());
        state.advance(PipelineStage::Scheduled);

        // Stage: report assembly
        if cancelled(&cancel, &mut state) {
            return state;
        }
        let (final_report, report_warnings) = report::assemble(
            &diagnosis,
            &risk_assessment,
            &planned.schedule,
            prediction.avg_rul,
            prediction.max_failure_probability,
            now,
            &self.narrative,
        )
        .await;
        state.warnings.extend(report_warnings);
        state.final_report = Some(final_report);
        state.advance(PipelineStage::Reported);

        info!(
            component = %diagnosis.probable_component,
            risk = %risk_assessment.risk_level,
            window = %planned.schedule.window,
            warnings = state.warnings.len(),
            "Analysis complete"
        );

        state
    }
}

/// Check the request-scoped cancellation signal between stages.
fn cancelled(cancel: &CancellationToken, state: &mut AnalysisState) -> bool {
    if cancel.is_cancelled() {
        state.fail(AnalysisError::Cancelled);
        return true;
    }
    false
}
