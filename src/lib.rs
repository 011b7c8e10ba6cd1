//! Engine Sentinel: Turbofan Predictive-Maintenance Intelligence
//!
//! Analysis core that turns one turbofan sensor snapshot into a structured
//! maintenance recommendation.
//!
//! ## Architecture
//!
//! - **Ensemble Predictor**: three model families scored concurrently, fused
//! - **Failure Embedder**: 128-dim unit vector for similarity search
//! - **Case Store**: historical failure precedents (embedded or managed)
//! - **Diagnosis Resolver**: classifier confidence blended with neighbor votes
//! - **Risk Scorer / Scheduler / Report Aggregator**: downstream stages
//! - **Pipeline Orchestrator**: fixed-order state machine per request

pub mod config;
pub mod types;
pub mod error;
pub mod models;
pub mod embedding;
pub mod store;
pub mod diagnosis;
pub mod narrative;
pub mod risk;
pub mod schedule;
pub mod report;
pub mod pipeline;

// Re-export deployment configuration
pub use config::SentinelConfig;

// Re-export commonly used types
pub use types::{
    ComponentId, DiagnosisResult, EnsemblePrediction, FinalReport, MaintenanceSchedule,
    MaintenanceWindow, ModelPrediction, Observation, RiskAssessment, RiskLevel,
};

// Re-export the pipeline surface
pub use error::AnalysisError;
pub use models::ModelRegistry;
pub use pipeline::{AnalysisPipeline, AnalysisState, PipelineStage};
pub use store::CaseStore;
