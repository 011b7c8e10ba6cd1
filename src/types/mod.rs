//! Shared data structures for the turbofan analysis pipeline
//!
//! This module defines the core types threaded through the five stages:
//! - Ingestion: Observation (validated 24-channel snapshot)
//! - Prediction: ModelPrediction, EnsemblePrediction
//! - Diagnosis: HistoricalCase, SimilarityMatch, DiagnosisResult
//! - Risk: RiskLevel, RiskAssessment
//! - Scheduling: MaintenanceWindow, MaintenanceSchedule
//! - Reporting: FinalReport

mod observation;
mod prediction;
mod case;
mod diagnosis;
mod risk;
mod schedule;
mod report;

pub use observation::*;
pub use prediction::*;
pub use case::*;
pub use diagnosis::*;
pub use risk::*;
pub use schedule::*;
pub use report::*;
