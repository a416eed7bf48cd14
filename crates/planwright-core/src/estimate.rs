//! Effort and priority heuristics for components.
//!
//! Both are pure, total functions. Unrecognized effort or priority levels
//! fall back to a fixed default instead of failing; the validator reports
//! the anomaly separately.

use planwright_model::{Component, PriorityLevel};

use crate::config::PlanningConfig;

/// Highest task priority.
pub const MAX_PRIORITY: i32 = 5;
/// Lowest task priority.
pub const MIN_PRIORITY: i32 = 1;

/// Estimates how long implementing a component takes, in hours.
pub trait EffortEstimator: Send + Sync {
    fn estimate(&self, component: &Component) -> f64;
}

/// Assigns an integer priority in `[MIN_PRIORITY, MAX_PRIORITY]` to a component.
pub trait PriorityCalculator: Send + Sync {
    fn priority(&self, component: &Component) -> i32;
}

/// Default effort heuristic:
/// `base(effort) * (1 + dep_factor * |deps|) * (1 + req_factor * |requirements|)`.
#[derive(Debug, Clone, Default)]
pub struct HeuristicEstimator {
    config: PlanningConfig,
}

impl HeuristicEstimator {
    pub fn new(config: PlanningConfig) -> Self {
        Self { config }
    }
}

impl EffortEstimator for HeuristicEstimator {
    fn estimate(&self, component: &Component) -> f64 {
        let base = self.config.effort_hours.base(component.effort_level());
        let dependency_factor =
            1.0 + self.config.dependency_factor * component.dependencies.len() as f64;
        let requirement_factor =
            1.0 + self.config.requirement_factor * component.requirements.len() as f64;
        base * dependency_factor * requirement_factor
    }
}

/// Default priority heuristic: low=1, medium=3, high=4, unknown=2, bumped by
/// one (capped at 5) for components with more than two dependencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPriority;

impl PriorityCalculator for HeuristicPriority {
    fn priority(&self, component: &Component) -> i32 {
        let base = match component.priority_level() {
            Some(PriorityLevel::Low) => 1,
            Some(PriorityLevel::Medium) => 3,
            Some(PriorityLevel::High) => 4,
            None => 2,
        };
        if component.dependencies.len() > 2 {
            (base + 1).min(MAX_PRIORITY)
        } else {
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn component(effort: &str, deps: usize, reqs: usize) -> Component {
        let mut c = Component::new("c", "");
        c.estimated_effort = effort.to_string();
        for i in 0..deps {
            c.dependencies.insert(format!("dep{i}"));
        }
        for i in 0..reqs {
            c.requirements.insert(format!("req{i}"), json!(true));
        }
        c
    }

    #[test]
    fn base_hours_per_level() {
        let est = HeuristicEstimator::default();
        assert_eq!(est.estimate(&component("low", 0, 0)), 8.0);
        assert_eq!(est.estimate(&component("medium", 0, 0)), 16.0);
        assert_eq!(est.estimate(&component("high", 0, 0)), 32.0);
    }

    #[test]
    fn unknown_effort_falls_back_to_medium() {
        let est = HeuristicEstimator::default();
        assert_eq!(est.estimate(&component("gigantic", 0, 0)), 16.0);
        assert_eq!(est.estimate(&component("", 0, 0)), 16.0);
    }

    #[test]
    fn dependencies_and_requirements_scale_estimate() {
        let est = HeuristicEstimator::default();
        // 16 * (1 + 0.2 * 2) * (1 + 0.1 * 3) = 16 * 1.4 * 1.3
        let hours = est.estimate(&component("medium", 2, 3));
        assert!((hours - 29.12).abs() < 1e-9, "got {hours}");
    }

    #[test]
    fn estimate_is_monotonic_in_effort() {
        let est = HeuristicEstimator::default();
        for (deps, reqs) in [(0, 0), (1, 2), (4, 1)] {
            let low = est.estimate(&component("low", deps, reqs));
            let medium = est.estimate(&component("medium", deps, reqs));
            let high = est.estimate(&component("high", deps, reqs));
            assert!(high >= medium && medium >= low);
        }
    }

    #[test]
    fn estimate_honours_config() {
        let mut cfg = PlanningConfig::default();
        cfg.effort_hours.low = 2.0;
        cfg.dependency_factor = 0.5;
        let est = HeuristicEstimator::new(cfg);
        assert_eq!(est.estimate(&component("low", 2, 0)), 4.0);
    }

    #[test]
    fn priority_levels() {
        let calc = HeuristicPriority;
        let mut c = Component::new("c", "");
        for (level, expected) in [("low", 1), ("medium", 3), ("high", 4), ("urgent", 2)] {
            c.priority = level.to_string();
            assert_eq!(calc.priority(&c), expected, "level {level}");
        }
    }

    #[test]
    fn many_dependencies_bump_priority_with_cap() {
        let calc = HeuristicPriority;
        let mut c = component("medium", 3, 0);
        c.priority = "high".to_string();
        assert_eq!(calc.priority(&c), 5);

        c.priority = "low".to_string();
        assert_eq!(calc.priority(&c), 2);

        // Exactly two dependencies does not bump.
        let mut two = component("medium", 2, 0);
        two.priority = "high".to_string();
        assert_eq!(calc.priority(&two), 4);
    }
}
