//! Error types for graph analysis and the planning facade.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use planwright_model::{TaskStatus, ValidationIssue};

/// Structural failure detected while ordering a task graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("dependency cycle detected involving tasks: {}", join_ids(.task_ids))]
    CycleDetected { task_ids: Vec<Uuid> },
}

fn join_ids(ids: &[Uuid]) -> String {
    ids.iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Stage of a generation attempt, reported with generation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    CriticalPath,
    Update,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CriticalPath => "critical path analysis",
            Self::Update => "update",
        };
        f.write_str(s)
    }
}

/// Errors surfaced by the planning facade.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// The input or the generated structure failed validation. Nothing was
    /// persisted.
    #[error("validation failed{}: {}", plan_suffix(.plan_id), summarize(.issues))]
    Validation {
        plan_id: Option<Uuid>,
        issues: Vec<ValidationIssue>,
    },

    /// An unexpected internal failure aborted generation.
    #[error("plan {plan_id}: generation failed during {phase}")]
    Generation {
        plan_id: Uuid,
        phase: Phase,
        #[source]
        source: GraphError,
    },

    /// Failure reported by the persistence collaborator, passed through as-is.
    #[error(transparent)]
    Store(#[from] anyhow::Error),

    #[error("plan {id} not found")]
    PlanNotFound { id: Uuid },

    #[error("task {task_id} not found in plan {plan_id}")]
    TaskNotFound { plan_id: Uuid, task_id: Uuid },

    #[error("invalid status transition for task {task_id}: {from} -> {to}")]
    InvalidTransition {
        task_id: Uuid,
        from: TaskStatus,
        to: TaskStatus,
    },

    #[error("invalid update: {reason}")]
    InvalidUpdate { reason: String },
}

impl PlanningError {
    /// Issues carried by a validation failure, empty for every other kind.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::Validation { issues, .. } => issues,
            _ => &[],
        }
    }
}

fn plan_suffix(plan_id: &Option<Uuid>) -> String {
    match plan_id {
        Some(id) => format!(" for plan {id}"),
        None => String::new(),
    }
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ValidationIssue::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for planning operations.
pub type Result<T> = std::result::Result<T, PlanningError>;

#[cfg(test)]
mod tests {
    use super::*;
    use planwright_model::IssueCode;

    #[test]
    fn validation_message_lists_issues() {
        let err = PlanningError::Validation {
            plan_id: None,
            issues: vec![ValidationIssue::new(IssueCode::NoComponents, "plan has no components")],
        };
        assert_eq!(
            err.to_string(),
            "validation failed: [error] NO_COMPONENTS: plan has no components"
        );
        assert_eq!(err.issues().len(), 1);
    }

    #[test]
    fn generation_error_keeps_cycle_as_source() {
        let id = Uuid::nil();
        let err = PlanningError::Generation {
            plan_id: id,
            phase: Phase::CriticalPath,
            source: GraphError::CycleDetected { task_ids: vec![id] },
        };
        assert!(err.to_string().contains("critical path analysis"));
        let source = std::error::Error::source(&err).expect("has source");
        assert!(source.to_string().contains("dependency cycle"));
    }

    #[test]
    fn store_errors_pass_through_unchanged() {
        let err = PlanningError::from(anyhow::anyhow!("disk full"));
        assert_eq!(err.to_string(), "disk full");
    }
}
