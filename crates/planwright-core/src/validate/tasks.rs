//! Structural checks over a generated task set and its critical path.

use std::collections::{HashMap, HashSet};

use serde_json::json;
use uuid::Uuid;

use planwright_model::{IssueCode, Task, TaskStatus, ValidationIssue};

use crate::estimate::{MAX_PRIORITY, MIN_PRIORITY};

/// Check that the task set is non-empty, ids are unique, dependencies
/// resolve, and hours, priority and status are in range.
pub fn validate_tasks(tasks: &[Task]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if tasks.is_empty() {
        issues.push(
            ValidationIssue::new(IssueCode::NoTasks, "task set is empty").with_field("tasks"),
        );
        return issues;
    }

    let ids: HashSet<Uuid> = tasks.iter().map(|t| t.id).collect();
    let mut seen = HashSet::new();

    for (i, task) in tasks.iter().enumerate() {
        if !seen.insert(task.id) {
            issues.push(
                ValidationIssue::new(
                    IssueCode::DuplicateTaskId,
                    format!("duplicate task id {}", task.id),
                )
                .with_field(format!("tasks[{i}].id")),
            );
        }

        for dependency in &task.dependencies {
            if !ids.contains(dependency) {
                issues.push(
                    ValidationIssue::new(
                        IssueCode::InvalidTaskDependency,
                        format!("task {:?} depends on unknown task {dependency}", task.name),
                    )
                    .with_field(format!("tasks[{i}].dependencies"))
                    .with_details(json!({ "task": task.id, "dependency": dependency })),
                );
            }
        }

        if !task.estimated_hours.is_finite() || task.estimated_hours <= 0.0 {
            issues.push(
                ValidationIssue::new(
                    IssueCode::InvalidHours,
                    format!(
                        "task {:?} has invalid estimated_hours {} (must be positive)",
                        task.name, task.estimated_hours
                    ),
                )
                .with_field(format!("tasks[{i}].estimated_hours")),
            );
        }

        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&task.priority) {
            issues.push(
                ValidationIssue::new(
                    IssueCode::InvalidPriority,
                    format!(
                        "task {:?} has priority {} (expected {MIN_PRIORITY}..={MAX_PRIORITY})",
                        task.name, task.priority
                    ),
                )
                .with_field(format!("tasks[{i}].priority")),
            );
        }

        if task.status.parse::<TaskStatus>().is_err() {
            issues.push(
                ValidationIssue::new(
                    IssueCode::InvalidStatus,
                    format!(
                        "task {:?} has invalid status {:?} (expected todo, in_progress, completed, or blocked)",
                        task.name, task.status
                    ),
                )
                .with_field(format!("tasks[{i}].status")),
            );
        }
    }

    issues
}

/// Check that `path` is non-empty, names known tasks, and forms a literal
/// dependency chain: each task depends on the one before it.
pub fn validate_critical_path(path: &[Uuid], tasks: &[Task]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if path.is_empty() {
        issues.push(
            ValidationIssue::new(IssueCode::EmptyCriticalPath, "critical path is empty")
                .with_field("critical_path"),
        );
        return issues;
    }

    let by_id: HashMap<Uuid, &Task> = tasks.iter().map(|t| (t.id, t)).collect();

    for (i, id) in path.iter().enumerate() {
        if !by_id.contains_key(id) {
            issues.push(
                ValidationIssue::new(
                    IssueCode::UnknownTask,
                    format!("critical path references unknown task {id}"),
                )
                .with_field(format!("critical_path[{i}]")),
            );
        }
    }

    for (i, pair) in path.windows(2).enumerate() {
        let (prev, next) = (pair[0], pair[1]);
        let Some(next_task) = by_id.get(&next) else {
            continue;
        };
        if by_id.contains_key(&prev) && !next_task.dependencies.contains(&prev) {
            issues.push(
                ValidationIssue::new(
                    IssueCode::BrokenChain,
                    format!(
                        "critical path step {} ({:?}) does not depend on the previous step",
                        i + 1,
                        next_task.name
                    ),
                )
                .with_field(format!("critical_path[{}]", i + 1))
                .with_details(json!({ "previous": prev, "task": next })),
            );
        }
    }

    issues
}
