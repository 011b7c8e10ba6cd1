//! Report Aggregator
//!
//! Pure merge of the prior stage outputs into the final report: a unique
//! identifier (timestamp + random suffix), a one-line headline, and a
//! narrative section delegated to the text-generation collaborator with
//! the same deterministic template fallback the diagnosis stage uses.

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::narrative::{NarrativeEngine, ReportFacts};
use crate::types::{
    DiagnosisResult, FinalReport, MaintenanceSchedule, RiskAssessment,
};

/// Assemble the final report. Returns the report plus any narrative
/// warnings to record.
pub async fn assemble(
    diagnosis: &DiagnosisResult,
    risk: &RiskAssessment,
    schedule: &MaintenanceSchedule,
    avg_rul: f64,
    max_failure_probability: f64,
    now: DateTime<Utc>,
    narrative: &NarrativeEngine,
) -> (FinalReport, Vec<String>) {
    let facts = ReportFacts {
        probable_component: diagnosis.probable_component,
        risk_level: risk.risk_level,
        risk_score: risk.risk_score,
        avg_rul,
        max_failure_probability,
        window: schedule.window,
        diagnosis_confidence: diagnosis.confidence,
        maintenance_overdue: schedule.maintenance_overdue,
    };

    let outcome = narrative.report_narrative(&facts).await;
    let warnings = outcome.warning.into_iter().collect();

    let headline = format!(
        "{}: {} risk — {} maintenance window",
        diagnosis.probable_component, risk.risk_level, schedule.window
    );

    (
        FinalReport {
            report_id: report_id(now),
            generated_at: now,
            headline,
            narrative: outcome.text,
            narrative_source: outcome.source,
        },
        warnings,
    )
}

/// Timestamp plus a 6-character random suffix.
fn report_id(now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("RPT-{}-{}", now.format("%Y%m%d%H%M%S"), suffix)
}
