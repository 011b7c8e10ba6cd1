//! Maintenance Scheduler
//!
//! Maps a risk level to a maintenance window through a fixed lookup
//! (HIGH→IMMEDIATE 24-48h, MEDIUM→SOON 1-2wk, LOW→ROUTINE 30-60d), derives
//! target/deadline dates, estimates remaining life at the target date, and
//! emits a per-window action list parameterized by the diagnosed component.

use chrono::{DateTime, Duration, Utc};

use crate::config::SchedulingConfig;
use crate::types::{
    ComponentId, DiagnosisResult, MaintenanceSchedule, MaintenanceWindow, RiskAssessment,
};

/// Outcome of planning: the schedule plus any warnings to record.
pub struct PlanOutcome {
    pub schedule: MaintenanceSchedule,
    pub warnings: Vec<String>,
}

/// Plan maintenance for one request.
///
/// `now` is passed in so planning stays a pure function of its inputs.
pub fn plan(
    risk: &RiskAssessment,
    diagnosis: &DiagnosisResult,
    avg_rul: f64,
    now: DateTime<Utc>,
    config: &SchedulingConfig,
) -> PlanOutcome {
    let window = MaintenanceWindow::for_risk(risk.risk_level);
    let (lower_hours, upper_hours) = window.bounds_hours();

    let target_date = now + Duration::hours(lower_hours);
    let deadline = now + Duration::hours(upper_hours);

    let cycles_per_hour = config.cycles_per_day / 24.0;
    let cycles_until_target = lower_hours as f64 * cycles_per_hour;
    let buffer_cycles = (upper_hours - lower_hours) as f64 * cycles_per_hour;

    let mut warnings = Vec::new();
    let raw_estimate = avg_rul - cycles_until_target;
    let (estimated_rul_at_maintenance, maintenance_overdue) = if raw_estimate < 0.0 {
        warnings.push(format!(
            "estimated RUL exhausted {:.0} cycles before the {} target date — maintenance may already be overdue",
            -raw_estimate, window
        ));
        (0.0, true)
    } else {
        (raw_estimate, false)
    };

    let schedule = MaintenanceSchedule {
        window,
        target_date,
        deadline,
        buffer_cycles,
        priority: window.priority(),
        estimated_rul_at_maintenance,
        maintenance_overdue,
        recommended_actions: recommended_actions(window, diagnosis.probable_component),
    };

    PlanOutcome { schedule, warnings }
}

/// Fixed action templates per window, parameterized by component name.
fn recommended_actions(window: MaintenanceWindow, component: ComponentId) -> Vec<String> {
    let name = component.label();
    match window {
        MaintenanceWindow::Immediate => vec![
            format!("Remove unit from service and open a borescope inspection of the {} section", name),
            format!("Stage replacement {} hardware and certified technicians", name),
            "Quarantine recent trend data for the reliability review".to_string(),
            "Notify fleet operations of the grounding window".to_string(),
        ],
        MaintenanceWindow::Soon => vec![
            format!("Schedule a {} section inspection at the next A-check", name),
            format!("Order long-lead {} spares now to meet the window", name),
            "Increase trend-monitoring frequency to every flight".to_string(),
        ],
        MaintenanceWindow::Routine => vec![
            format!("Fold a {} section review into the next scheduled shop visit", name),
            "Continue routine condition monitoring".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ComponentProbabilities, NarrativeSource, RiskLevel,
    };
    use chrono::TimeZone;

    fn risk(level: RiskLevel) -> RiskAssessment {
        RiskAssessment {
            risk_level: level,
            risk_score: 0.5,
            risk_factors: vec![],
            justification: String::new(),
            confidence: 1.0,
        }
    }

    fn diagnosis(component: ComponentId) -> DiagnosisResult {
        DiagnosisResult {
            probable_component: component,
            model_predicted_component: component,
            component_probabilities: ComponentProbabilities::new(0.2, 0.5, 0.3),
            similar_cases: vec![],
            anomaly_tags: vec![],
            reasoning: String::new(),
            reasoning_source: NarrativeSource::Template,
            confidence: 0.5,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("valid")
    }

    #[test]
    fn test_high_risk_immediate_window_dates() {
        let outcome = plan(
            &risk(RiskLevel::High),
            &diagnosis(ComponentId::CompressorDegradation),
            100.0,
            fixed_now(),
            &SchedulingConfig::default(),
        );
        let schedule = outcome.schedule;
        assert_eq!(schedule.window, MaintenanceWindow::Immediate);
        assert_eq!(schedule.target_date, fixed_now() + Duration::hours(24));
        assert_eq!(schedule.deadline, fixed_now() + Duration::hours(48));
        assert_eq!(schedule.priority, 1);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_estimated_rul_deducts_cycles_until_target() {
        // SOON window lower bound: 168h = 7 days * 6 cycles/day = 42 cycles
        let outcome = plan(
            &risk(RiskLevel::Medium),
            &diagnosis(ComponentId::FanDegradation),
            50.0,
            fixed_now(),
            &SchedulingConfig::default(),
        );
        assert!((outcome.schedule.estimated_rul_at_maintenance - 8.0).abs() < 1e-9);
        assert!(!outcome.schedule.maintenance_overdue);
    }

    #[test]
    fn test_negative_estimate_clamps_with_overdue_flag() {
        let outcome = plan(
            &risk(RiskLevel::Medium),
            &diagnosis(ComponentId::FanDegradation),
            10.0,
            fixed_now(),
            &SchedulingConfig::default(),
        );
        assert_eq!(outcome.schedule.estimated_rul_at_maintenance, 0.0);
        assert!(outcome.schedule.maintenance_overdue);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("overdue"));
    }

    #[test]
    fn test_actions_parameterized_by_component() {
        let outcome = plan(
            &risk(RiskLevel::High),
            &diagnosis(ComponentId::FanDegradation),
            100.0,
            fixed_now(),
            &SchedulingConfig::default(),
        );
        assert!(outcome
            .schedule
            .recommended_actions
            .iter()
            .any(|a| a.contains("Fan")));
    }

    #[test]
    fn test_routine_window_buffer_cycles() {
        // ROUTINE: 1440-720 = 720h = 30 days * 6 cycles/day = 180 cycles
        let outcome = plan(
            &risk(RiskLevel::Low),
            &diagnosis(ComponentId::Healthy),
            300.0,
            fixed_now(),
            &SchedulingConfig::default(),
        );
        assert!((outcome.schedule.buffer_cycles - 180.0).abs() < 1e-9);
        assert_eq!(outcome.schedule.priority, 3);
    }
}
