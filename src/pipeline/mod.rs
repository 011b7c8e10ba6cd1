//! Analysis Pipeline Module
//!
//! ## Stage sequence
//!
//! ```text
//! START       observation validated, state created
//! PREDICTED   three model families scored concurrently, outputs fused
//! DIAGNOSED   embedding computed, neighbors retrieved, component resolved
//! RISK_SCORED categorical level + continuous score from the ensemble
//! SCHEDULED   maintenance window, dates, actions
//! REPORTED    narrative report assembled — terminal success
//! FAILED      terminal error state, reachable from any non-terminal stage
//! ```
//!
//! GUARANTEE: on entry to FAILED the remaining stages are skipped and the
//! partial state is returned with its error recorded — never a panic.

mod state;
mod orchestrator;

pub use orchestrator::AnalysisPipeline;
pub use state::{AnalysisState, PipelineStage};
