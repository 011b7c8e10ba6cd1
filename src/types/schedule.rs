//! Maintenance scheduling types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RiskLevel;

/// Categorical urgency bucket driving scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MaintenanceWindow {
    /// 24-48 hours.
    Immediate,
    /// 1-2 weeks.
    Soon,
    /// 30-60 days.
    Routine,
}

impl MaintenanceWindow {
    /// Fixed lookup from risk level.
    pub fn for_risk(level: RiskLevel) -> Self {
        match level {
            RiskLevel::High => MaintenanceWindow::Immediate,
            RiskLevel::Medium => MaintenanceWindow::Soon,
            RiskLevel::Low => MaintenanceWindow::Routine,
        }
    }

    /// Window bounds as (lower, upper) hours from now.
    pub fn bounds_hours(&self) -> (i64, i64) {
        match self {
            MaintenanceWindow::Immediate => (24, 48),
            MaintenanceWindow::Soon => (168, 336),
            MaintenanceWindow::Routine => (720, 1440),
        }
    }

    /// Priority rank, 1 = highest.
    pub fn priority(&self) -> u8 {
        match self {
            MaintenanceWindow::Immediate => 1,
            MaintenanceWindow::Soon => 2,
            MaintenanceWindow::Routine => 3,
        }
    }
}

impl std::fmt::Display for MaintenanceWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaintenanceWindow::Immediate => write!(f, "IMMEDIATE"),
            MaintenanceWindow::Soon => write!(f, "SOON"),
            MaintenanceWindow::Routine => write!(f, "ROUTINE"),
        }
    }
}

/// Maintenance plan for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceSchedule {
    pub window: MaintenanceWindow,
    /// Earliest scheduled maintenance date (now + window lower bound).
    pub target_date: DateTime<Utc>,
    /// Latest acceptable date (now + window upper bound).
    pub deadline: DateTime<Utc>,
    /// Flight cycles available between target date and deadline.
    pub buffer_cycles: f64,
    /// Priority rank, 1 = highest.
    pub priority: u8,
    /// Estimated RUL remaining when maintenance begins (clamped to zero).
    pub estimated_rul_at_maintenance: f64,
    /// Set when the RUL estimate clamped to zero — maintenance may already
    /// be overdue.
    pub maintenance_overdue: bool,
    /// Ordered recommended actions, parameterized by component.
    pub recommended_actions: Vec<String>,
}
