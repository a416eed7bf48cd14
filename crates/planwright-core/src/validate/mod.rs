//! Pure structural checks.
//!
//! Nothing here returns an error: every check reports zero or more
//! [`ValidationIssue`]s and the caller decides what blocks.

pub mod plan;
pub mod tasks;
pub mod understanding;

use uuid::Uuid;

use planwright_model::{Plan, Task, ValidationIssue, ValidationSummary};

pub use plan::validate_plan;
pub use tasks::{validate_critical_path, validate_tasks};
pub use understanding::validate_understanding;

/// Run the plan, task and critical path checks together.
///
/// The critical path check is skipped for an empty task set, which already
/// yields a `NO_TASKS` issue.
pub fn validate_generation(
    plan: &Plan,
    tasks: &[Task],
    critical_path: &[Uuid],
) -> ValidationSummary {
    let mut issues: Vec<ValidationIssue> = validate_plan(plan);
    issues.extend(validate_tasks(tasks));
    if !tasks.is_empty() {
        issues.extend(validate_critical_path(critical_path, tasks));
    }
    ValidationSummary::new(issues)
}
