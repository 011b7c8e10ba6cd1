//! Risk assessment types.

use serde::{Deserialize, Serialize};

/// Categorical risk level for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Risk assessment derived from the fused ensemble. One per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    /// Continuous risk score in [0, 1].
    pub risk_score: f64,
    /// Contributing factor tags (e.g. "CRITICAL_RUL").
    pub risk_factors: Vec<String>,
    /// Human-readable justification.
    pub justification: String,
    /// Confidence in the assessment, discounted by model disagreement.
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(RiskLevel::High > RiskLevel::Medium);
        assert!(RiskLevel::Medium > RiskLevel::Low);
    }

    #[test]
    fn test_wire_casing() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::High).expect("serialize"),
            "\"HIGH\""
        );
        assert_eq!(
            serde_json::to_string(&RiskLevel::Medium).expect("serialize"),
            "\"MEDIUM\""
        );
    }
}
