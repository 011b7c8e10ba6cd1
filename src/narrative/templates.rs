//! Template-based narrative generation (fallback path)
//!
//! Deterministic sentences built from the same structured facts the
//! external collaborator would receive. Used when the service is disabled,
//! times out, or fails — the pipeline never blocks on narrative text.

use super::{DiagnosisFacts, ReportFacts};
use crate::types::{MaintenanceWindow, RiskLevel};

/// Deterministic diagnosis reasoning.
pub fn diagnosis_reasoning(facts: &DiagnosisFacts) -> String {
    let evidence = if facts.neighbor_count == 0 {
        "No comparable historical cases were available; the assessment rests on model confidence alone.".to_string()
    } else {
        format!(
            "{} comparable historical case(s) with mean similarity {:.2} support the assessment.",
            facts.neighbor_count, facts.mean_similarity
        )
    };

    let anomalies = if facts.anomaly_tags.is_empty() {
        String::new()
    } else {
        format!(" Flags raised: {}.", facts.anomaly_tags.join(", "))
    };

    format!(
        "{} identified as the probable failing component (classifier peak probability {:.2}, \
         classifier pick: {}). Ensemble estimates {:.0} cycles remaining with a peak failure \
         probability of {:.2}. {}{}",
        facts.probable_component,
        facts.max_component_probability,
        facts.model_predicted_component,
        facts.avg_rul,
        facts.max_failure_probability,
        evidence,
        anomalies
    )
}

/// Deterministic report narrative.
pub fn report_narrative(facts: &ReportFacts) -> String {
    let urgency = match facts.window {
        MaintenanceWindow::Immediate => "within 24-48 hours",
        MaintenanceWindow::Soon => "within 1-2 weeks",
        MaintenanceWindow::Routine => "within 30-60 days",
    };

    let risk_clause = match facts.risk_level {
        RiskLevel::High => "Risk is HIGH and the unit should not remain in normal rotation",
        RiskLevel::Medium => "Risk is MEDIUM; continued operation is acceptable under monitoring",
        RiskLevel::Low => "Risk is LOW; no operational restriction applies",
    };

    let overdue = if facts.maintenance_overdue {
        " Note: projected life is exhausted before the scheduled window — maintenance may already be overdue."
    } else {
        ""
    };

    format!(
        "Analysis attributes the degradation signature to the {} component with {:.0}% \
         diagnostic confidence. The ensemble projects {:.0} cycles of remaining useful life \
         (peak failure probability {:.2}, risk score {:.2}). {} — schedule maintenance {}.{}",
        facts.probable_component,
        facts.diagnosis_confidence * 100.0,
        facts.avg_rul,
        facts.max_failure_probability,
        facts.risk_score,
        risk_clause,
        urgency,
        overdue
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ComponentId;

    #[test]
    fn test_diagnosis_template_mentions_component_and_values() {
        let facts = DiagnosisFacts {
            probable_component: ComponentId::FanDegradation,
            model_predicted_component: ComponentId::FanDegradation,
            max_component_probability: 0.82,
            neighbor_count: 4,
            mean_similarity: 0.71,
            anomaly_tags: vec!["MODEL_DISAGREEMENT".to_string()],
            avg_rul: 55.0,
            max_failure_probability: 0.33,
        };
        let text = diagnosis_reasoning(&facts);
        assert!(text.contains("Fan"));
        assert!(text.contains("0.82"));
        assert!(text.contains("0.71"));
        assert!(text.contains("MODEL_DISAGREEMENT"));
    }

    #[test]
    fn test_diagnosis_template_empty_case_set() {
        let facts = DiagnosisFacts {
            probable_component: ComponentId::General,
            model_predicted_component: ComponentId::Healthy,
            max_component_probability: 0.4,
            neighbor_count: 0,
            mean_similarity: 0.0,
            anomaly_tags: vec![],
            avg_rul: 80.0,
            max_failure_probability: 0.2,
        };
        let text = diagnosis_reasoning(&facts);
        assert!(text.contains("model confidence alone"));
    }

    #[test]
    fn test_report_template_is_deterministic() {
        let facts = ReportFacts {
            probable_component: ComponentId::CompressorDegradation,
            risk_level: RiskLevel::High,
            risk_score: 0.85,
            avg_rul: 22.0,
            max_failure_probability: 0.7,
            window: MaintenanceWindow::Immediate,
            diagnosis_confidence: 0.74,
            maintenance_overdue: true,
        };
        let first = report_narrative(&facts);
        let second = report_narrative(&facts);
        assert_eq!(first, second);
        assert!(first.contains("24-48 hours"));
        assert!(first.contains("overdue"));
    }
}
