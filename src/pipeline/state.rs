//! Analysis state: the single mutable aggregate threaded through stages.
//!
//! One `AnalysisState` is created per request, owned exclusively by that
//! request, and discarded after the response is produced — never shared
//! across requests, never persisted. Stage outputs land in the optional
//! fields as the state machine advances; a terminal error short-circuits
//! the rest.

use serde::Serialize;

use crate::error::AnalysisError;
use crate::types::{
    DiagnosisResult, EnsemblePrediction, FinalReport, MaintenanceSchedule, Observation,
    RiskAssessment,
};

/// Named states of the pipeline state machine.
///
/// Transitions are strictly sequential
/// (`Start → Predicted → Diagnosed → RiskScored → Scheduled → Reported`)
/// with `Failed` reachable from any non-terminal state. No stage may run
/// out of order and no stage runs twice per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStage {
    Start,
    Predicted,
    Diagnosed,
    RiskScored,
    Scheduled,
    Reported,
    Failed,
}

impl PipelineStage {
    /// Whether `next` is the single allowed successor of `self`.
    /// `Failed` is allowed from every non-terminal state.
    pub fn allows(self, next: PipelineStage) -> bool {
        use PipelineStage::*;
        matches!(
            (self, next),
            (Start, Predicted)
                | (Predicted, Diagnosed)
                | (Diagnosed, RiskScored)
                | (RiskScored, Scheduled)
                | (Scheduled, Reported)
        ) || (next == Failed && !self.is_terminal())
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Reported | PipelineStage::Failed)
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::Start => "START",
            PipelineStage::Predicted => "PREDICTED",
            PipelineStage::Diagnosed => "DIAGNOSED",
            PipelineStage::RiskScored => "RISK_SCORED",
            PipelineStage::Scheduled => "SCHEDULED",
            PipelineStage::Reported => "REPORTED",
            PipelineStage::Failed => "FAILED",
        };
        write!(f, "{}", name)
    }
}

/// Per-request aggregate. Serializes with the wire-contract field names;
/// absent stages are omitted so a partial (failed) state still produces a
/// valid response body.
#[derive(Debug, Serialize)]
pub struct AnalysisState {
    #[serde(skip)]
    observation: Observation,

    /// Current state-machine position.
    pub stage: PipelineStage,

    #[serde(rename = "predictions", skip_serializing_if = "Option::is_none")]
    pub prediction: Option<EnsemblePrediction>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<DiagnosisResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_assessment: Option<RiskAssessment>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_schedule: Option<MaintenanceSchedule>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_report: Option<FinalReport>,

    /// Terminal error, present only in the FAILED state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<AnalysisError>,

    /// Non-fatal degradations recorded along the way.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl AnalysisState {
    /// Fresh state at `START` for one validated observation.
    pub fn new(observation: Observation) -> Self {
        Self {
            observation,
            stage: PipelineStage::Start,
            prediction: None,
            diagnosis: None,
            risk_assessment: None,
            maintenance_schedule: None,
            final_report: None,
            error: None,
            warnings: Vec::new(),
        }
    }

    /// The validated observation this request analyzes.
    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    /// Advance to the next stage. The transition table is the structural
    /// guarantee that stages run in order exactly once.
    pub fn advance(&mut self, next: PipelineStage) {
        debug_assert!(
            self.stage.allows(next),
            "illegal pipeline transition {} -> {}",
            self.stage,
            next
        );
        self.stage = next;
    }

    /// Record a terminal error and enter `FAILED`.
    pub fn fail(&mut self, error: AnalysisError) {
        debug_assert!(!self.stage.is_terminal(), "fail() after terminal state");
        self.error = Some(error);
        self.stage = PipelineStage::Failed;
    }

    /// Whether the run completed the full stage sequence.
    pub fn is_complete(&self) -> bool {
        self.stage == PipelineStage::Reported
    }
}
