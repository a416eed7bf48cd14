//! Progress overview of a generation record.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use planwright_model::{GenerationRecord, PlanStatus, TaskStatus};

/// Task counts and hours for one plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSummary {
    pub plan_id: Uuid,
    pub title: String,
    pub status: PlanStatus,
    pub total_tasks: usize,
    /// Task count per status string. Unrecognized statuses are counted
    /// under their raw value.
    pub tasks_by_status: BTreeMap<String, usize>,
    pub total_hours: f64,
    pub completed_hours: f64,
    pub critical_path_hours: f64,
}

impl PlanSummary {
    pub fn from_record(record: &GenerationRecord) -> Self {
        let mut tasks_by_status = BTreeMap::new();
        let mut total_hours = 0.0;
        let mut completed_hours = 0.0;

        for task in &record.tasks {
            *tasks_by_status.entry(task.status.clone()).or_insert(0) += 1;
            total_hours += task.estimated_hours;
            if matches!(task.status(), Ok(TaskStatus::Completed)) {
                completed_hours += task.estimated_hours;
            }
        }

        let critical_path_hours = record
            .critical_path
            .iter()
            .filter_map(|id| record.task(*id))
            .map(|t| t.estimated_hours)
            .sum();

        Self {
            plan_id: record.plan_id(),
            title: record.plan.title.clone(),
            status: record.plan.status,
            total_tasks: record.tasks.len(),
            tasks_by_status,
            total_hours,
            completed_hours,
            critical_path_hours,
        }
    }

    /// Fraction of estimated hours already completed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.total_hours > 0.0 {
            self.completed_hours / self.total_hours
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planwright_model::{Plan, Task, TaskKind, ValidationSummary};

    #[test]
    fn counts_and_hours() {
        let a = Task::new(TaskKind::Implement, "Implement a", "a", 6.0, 3);
        let mut b = Task::new(TaskKind::Test, "Test a", "a", 2.0, 3);
        b.dependencies.insert(a.id);
        b.status = "completed".to_string();
        let mut c = Task::new(TaskKind::Document, "Document a", "a", 4.0, 3);
        c.status = "paused".to_string();

        let record = GenerationRecord {
            plan: Plan::new("p", ""),
            critical_path: vec![a.id, b.id],
            tasks: vec![a, b, c],
            validation: ValidationSummary::default(),
        };
        let summary = PlanSummary::from_record(&record);
        assert_eq!(summary.total_tasks, 3);
        assert_eq!(summary.tasks_by_status["todo"], 1);
        assert_eq!(summary.tasks_by_status["completed"], 1);
        assert_eq!(summary.tasks_by_status["paused"], 1);
        assert_eq!(summary.total_hours, 12.0);
        assert_eq!(summary.completed_hours, 2.0);
        assert_eq!(summary.critical_path_hours, 8.0);
        assert!((summary.progress() - 2.0 / 12.0).abs() < 1e-9);
    }
}
