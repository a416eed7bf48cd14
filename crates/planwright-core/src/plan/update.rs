//! Partial updates to stored plans and tasks.
//!
//! An update is applied to a copy of the stored record, the critical path is
//! recomputed, and the whole validator runs again. If any issue shows up that
//! the stored record did not already have, the update is rejected and nothing
//! is saved.

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use planwright_model::{
    GenerationRecord, IssueCode, PlanStatus, TaskStatus, ValidationIssue, ValidationSummary,
};

use super::service::Planner;
use crate::error::{Phase, PlanningError, Result};
use crate::graph::TaskGraph;
use crate::validate::validate_generation;

// ---------------------------------------------------------------------------
// Update payloads
// ---------------------------------------------------------------------------

/// Sparse set of plan fields to change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parsed as a [`PlanStatus`] when applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl PlanUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

/// Sparse set of task fields to change. Dependencies and ids cannot be
/// updated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parsed as a [`TaskStatus`] when applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// `None`: leave as is. `Some(None)`: unassign.
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub assignee: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.assignee.is_none()
            && self.estimated_hours.is_none()
            && self.priority.is_none()
    }
}

/// Distinguish a present `null` from an absent field.
fn explicit_null<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn parse_fields<T: for<'de> Deserialize<'de>>(fields: serde_json::Value) -> Result<T> {
    serde_json::from_value(fields).map_err(|e| PlanningError::InvalidUpdate {
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Facade operations
// ---------------------------------------------------------------------------

impl Planner {
    /// Apply a sparse JSON field map to a stored plan.
    pub async fn update_plan_fields(
        &self,
        plan_id: Uuid,
        fields: serde_json::Value,
    ) -> Result<GenerationRecord> {
        self.update_plan(plan_id, parse_fields(fields)?).await
    }

    /// Apply a sparse JSON field map to one task of a stored plan.
    pub async fn update_task_fields(
        &self,
        plan_id: Uuid,
        task_id: Uuid,
        fields: serde_json::Value,
    ) -> Result<GenerationRecord> {
        self.update_task(plan_id, task_id, parse_fields(fields)?)
            .await
    }

    /// Change plan title, description or status.
    pub async fn update_plan(
        &self,
        plan_id: Uuid,
        update: PlanUpdate,
    ) -> Result<GenerationRecord> {
        if update.is_empty() {
            return Err(PlanningError::InvalidUpdate {
                reason: "no fields to update".to_string(),
            });
        }
        let status = update
            .status
            .as_deref()
            .map(str::parse::<PlanStatus>)
            .transpose()
            .map_err(|e| PlanningError::InvalidUpdate {
                reason: e.to_string(),
            })?;

        let stored = self.load(plan_id).await?;
        let mut record = stored.clone();
        if let Some(title) = update.title {
            record.plan.title = title;
        }
        if let Some(description) = update.description {
            record.plan.description = description;
        }
        if let Some(status) = status {
            record.plan.status = status;
        }
        record.plan.updated_at = Utc::now();

        self.commit(&stored, record).await
    }

    /// Change one task's status, assignee, estimate or descriptive fields.
    ///
    /// Status changes must follow [`TaskStatus::can_transition_to`]. Entering
    /// `in_progress` stamps `started_at` once; entering `completed` stamps
    /// `completed_at`, which is cleared again if the task is reopened.
    pub async fn update_task(
        &self,
        plan_id: Uuid,
        task_id: Uuid,
        update: TaskUpdate,
    ) -> Result<GenerationRecord> {
        if update.is_empty() {
            return Err(PlanningError::InvalidUpdate {
                reason: "no fields to update".to_string(),
            });
        }
        let status = update
            .status
            .as_deref()
            .map(str::parse::<TaskStatus>)
            .transpose()
            .map_err(|e| PlanningError::InvalidUpdate {
                reason: e.to_string(),
            })?;

        let stored = self.load(plan_id).await?;
        let mut record = stored.clone();
        let now = Utc::now();
        let task = record
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(PlanningError::TaskNotFound { plan_id, task_id })?;

        if let Some(to) = status {
            // An unparseable stored status can be overwritten with any valid one.
            let from = task.status().ok();
            if let Some(from) = from {
                if !from.can_transition_to(to) {
                    return Err(PlanningError::InvalidTransition { task_id, from, to });
                }
            }
            if from != Some(to) {
                task.completed_at = (to == TaskStatus::Completed).then_some(now);
                if to == TaskStatus::InProgress && task.started_at.is_none() {
                    task.started_at = Some(now);
                }
            }
            task.status = to.to_string();
        }
        if let Some(name) = update.name {
            task.name = name;
        }
        if let Some(description) = update.description {
            task.description = description;
        }
        if let Some(assignee) = update.assignee {
            task.assignee = assignee;
        }
        if let Some(hours) = update.estimated_hours {
            task.estimated_hours = hours;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        record.plan.updated_at = now;

        self.commit(&stored, record).await
    }

    /// Recompute derived state, re-validate and save `record` unless it
    /// introduces issues `stored` did not have.
    async fn commit(
        &self,
        stored: &GenerationRecord,
        mut record: GenerationRecord,
    ) -> Result<GenerationRecord> {
        let plan_id = record.plan_id();
        let path = self
            .critical_path(&record.tasks)
            .map_err(|source| PlanningError::Generation {
                plan_id,
                phase: Phase::Update,
                source,
            })?;
        let graph = TaskGraph::new(std::mem::take(&mut record.tasks));
        record.plan.estimated_timeline = Some(graph.timeline(&path, self.config()));
        record.tasks = graph.into_tasks();
        record.critical_path = path.task_ids;

        let before = validate_generation(&stored.plan, &stored.tasks, &stored.critical_path);
        let after = validate_generation(&record.plan, &record.tasks, &record.critical_path);
        let introduced = new_issues(&before, &after);
        if !introduced.is_empty() {
            warn!(
                plan_id = %plan_id,
                issues = introduced.len(),
                "rejecting update that introduces validation issues"
            );
            return Err(PlanningError::Validation {
                plan_id: Some(plan_id),
                issues: introduced,
            });
        }

        record.validation = after;
        self.store.save(&record).await?;
        info!(plan_id = %plan_id, "updated plan");
        Ok(record)
    }
}

/// Issues in `after` whose (code, field) pair does not occur in `before`.
fn new_issues(before: &ValidationSummary, after: &ValidationSummary) -> Vec<ValidationIssue> {
    let known: HashSet<(IssueCode, Option<&str>)> = before
        .issues
        .iter()
        .map(|i| (i.code, i.field.as_deref()))
        .collect();
    after
        .issues
        .iter()
        .filter(|i| !known.contains(&(i.code, i.field.as_deref())))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_update_rejects_structural_fields() {
        let err = parse_fields::<TaskUpdate>(serde_json::json!({ "dependencies": [] }))
            .unwrap_err();
        assert!(
            matches!(err, PlanningError::InvalidUpdate { .. }),
            "expected InvalidUpdate, got: {err}"
        );
        assert!(parse_fields::<PlanUpdate>(serde_json::json!({ "id": "x" })).is_err());
    }

    #[test]
    fn assignee_null_differs_from_absent() {
        let absent: TaskUpdate = parse_fields(serde_json::json!({ "priority": 2 })).unwrap();
        assert_eq!(absent.assignee, None);

        let cleared: TaskUpdate = parse_fields(serde_json::json!({ "assignee": null })).unwrap();
        assert_eq!(cleared.assignee, Some(None));

        let set: TaskUpdate = parse_fields(serde_json::json!({ "assignee": "ada" })).unwrap();
        assert_eq!(set.assignee, Some(Some("ada".to_string())));
    }

    #[test]
    fn only_unseen_issues_count_as_new() {
        let warning = ValidationIssue::new(IssueCode::InvalidDependency, "old")
            .with_field("components[0].dependencies");
        let before = ValidationSummary::new(vec![warning.clone()]);
        let after = ValidationSummary::new(vec![
            warning,
            ValidationIssue::new(IssueCode::InvalidHours, "new")
                .with_field("tasks[1].estimated_hours"),
        ]);
        let introduced = new_issues(&before, &after);
        assert_eq!(introduced.len(), 1);
        assert_eq!(introduced[0].code, IssueCode::InvalidHours);
    }
}
