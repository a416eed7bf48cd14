//! Validation issues and the generation record handed to persistence.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Plan, Task};

// ---------------------------------------------------------------------------
// Validation issues
// ---------------------------------------------------------------------------

/// Machine-readable classification of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    // Understanding
    MissingField,
    NoAlgorithmsOrArchitecture,
    // Plan
    MissingId,
    MissingTitle,
    NoComponents,
    NoRequirements,
    DuplicateComponent,
    InvalidDependency,
    SelfDependency,
    CircularDependency,
    InvalidEffort,
    InvalidPriorityLevel,
    // Tasks
    NoTasks,
    DuplicateTaskId,
    InvalidTaskDependency,
    InvalidHours,
    InvalidPriority,
    InvalidStatus,
    // Critical path
    EmptyCriticalPath,
    UnknownTask,
    BrokenChain,
}

impl IssueCode {
    /// Wire name of the code, e.g. `INVALID_DEPENDENCY`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "MISSING_FIELD",
            Self::NoAlgorithmsOrArchitecture => "NO_ALGORITHMS_OR_ARCHITECTURE",
            Self::MissingId => "MISSING_ID",
            Self::MissingTitle => "MISSING_TITLE",
            Self::NoComponents => "NO_COMPONENTS",
            Self::NoRequirements => "NO_REQUIREMENTS",
            Self::DuplicateComponent => "DUPLICATE_COMPONENT",
            Self::InvalidDependency => "INVALID_DEPENDENCY",
            Self::SelfDependency => "SELF_DEPENDENCY",
            Self::CircularDependency => "CIRCULAR_DEPENDENCY",
            Self::InvalidEffort => "INVALID_EFFORT",
            Self::InvalidPriorityLevel => "INVALID_PRIORITY_LEVEL",
            Self::NoTasks => "NO_TASKS",
            Self::DuplicateTaskId => "DUPLICATE_TASK_ID",
            Self::InvalidTaskDependency => "INVALID_TASK_DEPENDENCY",
            Self::InvalidHours => "INVALID_HOURS",
            Self::InvalidPriority => "INVALID_PRIORITY",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::EmptyCriticalPath => "EMPTY_CRITICAL_PATH",
            Self::UnknownTask => "UNKNOWN_TASK",
            Self::BrokenChain => "BROKEN_CHAIN",
        }
    }

    /// Default severity for the code.
    ///
    /// Only the fail-soft anomalies (an unresolved component dependency and
    /// unrecognized effort/priority levels) are warnings.
    pub fn severity(self) -> Severity {
        match self {
            Self::InvalidDependency | Self::InvalidEffort | Self::InvalidPriorityLevel => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How serious a validation issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// A single structural problem found by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub code: IssueCode,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ValidationIssue {
    /// Create an issue with the code's default severity.
    pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.severity(),
            message: message.into(),
            field: None,
            details: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)?;
        if let Some(field) = &self.field {
            write!(f, " (field: {field})")?;
        }
        Ok(())
    }
}

/// Flat list of issues produced by one validator run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationSummary {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// True when no error-severity issue is present. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(ValidationIssue::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| !i.is_error())
    }

    /// True when any issue carries `code`.
    pub fn has(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }
}

// ---------------------------------------------------------------------------
// Generation record
// ---------------------------------------------------------------------------

/// Everything one plan generation produced, ready to be persisted keyed by
/// [`Plan::id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub plan: Plan,
    pub tasks: Vec<Task>,
    /// Task ids in chronological order along the critical path.
    pub critical_path: Vec<Uuid>,
    pub validation: ValidationSummary,
}

impl GenerationRecord {
    pub fn plan_id(&self) -> Uuid {
        self.plan.id
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_in_screaming_snake_case() {
        let json = serde_json::to_string(&IssueCode::InvalidDependency).unwrap();
        assert_eq!(json, "\"INVALID_DEPENDENCY\"");
        assert_eq!(IssueCode::NoTasks.to_string(), "NO_TASKS");

        let back: IssueCode = serde_json::from_str("\"CIRCULAR_DEPENDENCY\"").unwrap();
        assert_eq!(back, IssueCode::CircularDependency);
    }

    #[test]
    fn fail_soft_codes_are_warnings() {
        assert_eq!(IssueCode::InvalidDependency.severity(), Severity::Warning);
        assert_eq!(IssueCode::InvalidEffort.severity(), Severity::Warning);
        assert_eq!(IssueCode::InvalidPriority.severity(), Severity::Error);
        assert_eq!(IssueCode::CircularDependency.severity(), Severity::Error);
    }

    #[test]
    fn summary_validity_ignores_warnings() {
        let mut summary = ValidationSummary::new(vec![ValidationIssue::new(
            IssueCode::InvalidEffort,
            "unknown effort",
        )]);
        assert!(summary.is_valid());
        assert_eq!(summary.warnings().count(), 1);

        summary
            .issues
            .push(ValidationIssue::new(IssueCode::NoTasks, "no tasks").with_field("tasks"));
        assert!(!summary.is_valid());
        assert!(summary.has(IssueCode::NoTasks));
        assert_eq!(summary.errors().count(), 1);
    }

    #[test]
    fn issue_display_includes_field() {
        let issue = ValidationIssue::new(IssueCode::InvalidHours, "hours must be positive")
            .with_field("tasks[2].estimated_hours");
        assert_eq!(
            issue.to_string(),
            "[error] INVALID_HOURS: hours must be positive (field: tasks[2].estimated_hours)"
        );
    }
}
