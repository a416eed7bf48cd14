//! Tunable constants for estimation, task generation and scheduling.
//!
//! [`PlanningConfig::default`] reproduces the reference heuristics exactly;
//! every field can be overridden from the `[planning]` section of the CLI
//! config file.

use serde::{Deserialize, Serialize};

use planwright_model::EffortLevel;

/// Base hours per declared effort level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffortHours {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    /// Used when a component declares an unrecognized effort level.
    pub fallback: f64,
}

impl EffortHours {
    /// Base hours for a parsed level, or the fallback for `None`.
    pub fn base(&self, level: Option<EffortLevel>) -> f64 {
        match level {
            Some(EffortLevel::Low) => self.low,
            Some(EffortLevel::Medium) => self.medium,
            Some(EffortLevel::High) => self.high,
            None => self.fallback,
        }
    }
}

impl Default for EffortHours {
    fn default() -> Self {
        Self {
            low: 8.0,
            medium: 16.0,
            high: 32.0,
            fallback: 16.0,
        }
    }
}

/// Planning configuration shared by the estimators, the task graph builder
/// and the critical path analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    pub effort_hours: EffortHours,
    /// Added to the effort multiplier for each declared dependency.
    pub dependency_factor: f64,
    /// Added to the effort multiplier for each requirement key.
    pub requirement_factor: f64,
    /// Fixed duration of the setup task.
    pub setup_hours: f64,
    /// Fixed duration of every document task.
    pub document_hours: f64,
    /// Lower bound for test task duration.
    pub min_test_hours: f64,
    /// Test duration as a fraction of implementation duration.
    pub test_ratio: f64,
    /// Tolerance when matching earliest-completion times in the backward trace.
    pub tolerance: f64,
    /// Working hours per day, used for the derived timeline.
    pub hours_per_day: f64,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            effort_hours: EffortHours::default(),
            dependency_factor: 0.2,
            requirement_factor: 0.1,
            setup_hours: 4.0,
            document_hours: 4.0,
            min_test_hours: 4.0,
            test_ratio: 0.5,
            tolerance: 1e-3,
            hours_per_day: 8.0,
        }
    }
}
