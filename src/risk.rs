//! Risk Scorer
//!
//! Pure function of the fused ensemble. Level rules evaluate in fixed
//! order — HIGH's conditions are checked first and short-circuit the rest:
//!
//! - HIGH:   `max_failure_probability > 0.5` OR `avg_rul < 30`
//! - MEDIUM: `30 <= avg_rul < 60` (and not already HIGH)
//! - LOW:    otherwise
//!
//! Score: `max(1 - avg_rul/100, max_failure_probability)` clamped to
//! [0, 1]. An avg_rul above 100 makes the first term negative; the max
//! with a non-negative probability dominates in practice but the clamp is
//! still part of the contract.

use crate::config::RiskConfig;
use crate::types::{EnsemblePrediction, RiskAssessment, RiskLevel};

/// Probability above which the request is HIGH risk regardless of RUL.
const HIGH_PROBABILITY_BOUND: f64 = 0.5;

/// RUL below which the request is HIGH risk regardless of probability.
const CRITICAL_RUL_CYCLES: f64 = 30.0;

/// RUL below which (and not HIGH) the request is MEDIUM risk.
const WATCH_RUL_CYCLES: f64 = 60.0;

/// Assess risk for one fused prediction.
pub fn assess(prediction: &EnsemblePrediction, config: &RiskConfig) -> RiskAssessment {
    let avg_rul = prediction.avg_rul;
    let max_probability = prediction.max_failure_probability;

    let risk_level = if max_probability > HIGH_PROBABILITY_BOUND || avg_rul < CRITICAL_RUL_CYCLES
    {
        RiskLevel::High
    } else if avg_rul < WATCH_RUL_CYCLES {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    let risk_score = (1.0 - avg_rul / 100.0).max(max_probability).clamp(0.0, 1.0);

    let mut risk_factors = Vec::new();
    if avg_rul < CRITICAL_RUL_CYCLES {
        risk_factors.push("CRITICAL_RUL".to_string());
    }
    if max_probability > HIGH_PROBABILITY_BOUND {
        risk_factors.push("HIGH_FAILURE_PROBABILITY".to_string());
    }
    let spread = prediction.rul_spread();
    if spread > config.model_disagreement_cycles {
        risk_factors.push("MODEL_DISAGREEMENT".to_string());
    }

    // Disagreement across the three arms discounts confidence in the
    // fused estimate; fully agreeing arms score 1.0.
    let spread_ratio = spread / avg_rul.max(1.0);
    let confidence = (1.0 - 0.5 * spread_ratio).clamp(0.5, 1.0);

    let justification = format!(
        "{} risk: ensemble RUL {:.0} cycles, peak failure probability {:.2}, \
         model RUL spread {:.0} cycles.",
        risk_level, avg_rul, max_probability, spread
    );

    RiskAssessment {
        risk_level,
        risk_score,
        risk_factors,
        justification,
        confidence,
    }
}
