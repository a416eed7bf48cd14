use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Component name used for the bootstrap task that is not owned by any
/// declared component.
pub const SETUP_COMPONENT: &str = "setup";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Relative implementation effort declared on a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffortLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for EffortLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for EffortLevel {
    type Err = EffortLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(EffortLevelParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`EffortLevel`] string.
#[derive(Debug, Clone)]
pub struct EffortLevelParseError(pub String);

impl fmt::Display for EffortLevelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid effort level: {:?}", self.0)
    }
}

impl std::error::Error for EffortLevelParseError {}

// ---------------------------------------------------------------------------

/// Declared priority of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for PriorityLevel {
    type Err = PriorityLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(PriorityLevelParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`PriorityLevel`] string.
#[derive(Debug, Clone)]
pub struct PriorityLevelParseError(pub String);

impl fmt::Display for PriorityLevelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid priority level: {:?}", self.0)
    }
}

impl std::error::Error for PriorityLevelParseError {}

// ---------------------------------------------------------------------------

/// Status of a component inside a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        };
        f.write_str(s)
    }
}

impl FromStr for ComponentStatus {
    type Err = ComponentStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(Self::Planned),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(ComponentStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ComponentStatus`] string.
#[derive(Debug, Clone)]
pub struct ComponentStatusParseError(pub String);

impl fmt::Display for ComponentStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid component status: {:?}", self.0)
    }
}

impl std::error::Error for ComponentStatusParseError {}

// ---------------------------------------------------------------------------

/// Status of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    #[default]
    Draft,
    Approved,
    InProgress,
    Completed,
    Archived,
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Archived => "archived",
        };
        f.write_str(s)
    }
}

impl FromStr for PlanStatus {
    type Err = PlanStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "approved" => Ok(Self::Approved),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            other => Err(PlanStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`PlanStatus`] string.
#[derive(Debug, Clone)]
pub struct PlanStatusParseError(pub String);

impl fmt::Display for PlanStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid plan status: {:?}", self.0)
    }
}

impl std::error::Error for PlanStatusParseError {}

// ---------------------------------------------------------------------------

/// Status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
    Blocked,
}

impl TaskStatus {
    /// Check whether moving from `self` to `to` is an edge of the task
    /// lifecycle graph:
    ///
    /// ```text
    /// todo        -> in_progress | blocked
    /// in_progress -> completed | blocked | todo
    /// blocked     -> todo | in_progress
    /// completed   -> in_progress  (reopen)
    /// ```
    ///
    /// Staying in the same status is always allowed.
    pub fn can_transition_to(self, to: TaskStatus) -> bool {
        self == to
            || matches!(
                (self, to),
                (Self::Todo, Self::InProgress)
                    | (Self::Todo, Self::Blocked)
                    | (Self::InProgress, Self::Completed)
                    | (Self::InProgress, Self::Blocked)
                    | (Self::InProgress, Self::Todo)
                    | (Self::Blocked, Self::Todo)
                    | (Self::Blocked, Self::InProgress)
                    | (Self::Completed, Self::InProgress)
            )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Blocked => "blocked",
        };
        f.write_str(s)
    }
}

impl FromStr for TaskStatus {
    type Err = TaskStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "blocked" => Ok(Self::Blocked),
            other => Err(TaskStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`TaskStatus`] string.
#[derive(Debug, Clone)]
pub struct TaskStatusParseError(pub String);

impl fmt::Display for TaskStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid task status: {:?}", self.0)
    }
}

impl std::error::Error for TaskStatusParseError {}

// ---------------------------------------------------------------------------

/// Which phase of a component's work a generated task covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Setup,
    Implement,
    Test,
    Document,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Setup => "setup",
            Self::Implement => "implement",
            Self::Test => "test",
            Self::Document => "document",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One named, dependency-aware unit of work inside a [`Plan`].
///
/// `estimated_effort` and `priority` are kept as the raw strings supplied by
/// the caller. Unrecognized values are legal here; the estimators fall back
/// to documented defaults and the validator reports them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Component {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Names of other components in the same plan.
    #[serde(default)]
    pub dependencies: BTreeSet<String>,
    /// Open key/value requirement metadata.
    #[serde(default)]
    pub requirements: BTreeMap<String, serde_json::Value>,
    #[serde(default = "default_level")]
    pub estimated_effort: String,
    #[serde(default = "default_level")]
    pub priority: String,
    #[serde(default)]
    pub status: ComponentStatus,
}

fn default_level() -> String {
    "medium".to_string()
}

impl Component {
    /// Create a component with no dependencies, no requirements and medium
    /// effort/priority.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            dependencies: BTreeSet::new(),
            requirements: BTreeMap::new(),
            estimated_effort: default_level(),
            priority: default_level(),
            status: ComponentStatus::Planned,
        }
    }

    /// Parsed effort level, or `None` if the declared value is unrecognized.
    pub fn effort_level(&self) -> Option<EffortLevel> {
        self.estimated_effort.parse().ok()
    }

    /// Parsed priority level, or `None` if the declared value is unrecognized.
    pub fn priority_level(&self) -> Option<PriorityLevel> {
        self.priority.parse().ok()
    }
}

/// Aggregate requirements of a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Requirements {
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub libraries: Vec<String>,
    #[serde(default)]
    pub compute: Vec<String>,
    #[serde(default)]
    pub datasets: Vec<String>,
    #[serde(default)]
    pub evaluation_metrics: Vec<String>,
}

impl Requirements {
    /// True when no requirement of any kind is declared.
    pub fn is_empty(&self) -> bool {
        self.frameworks.is_empty()
            && self.libraries.is_empty()
            && self.compute.is_empty()
            && self.datasets.is_empty()
            && self.evaluation_metrics.is_empty()
    }

    /// True when frameworks or libraries have to be installed before any
    /// implementation work can start.
    pub fn needs_setup(&self) -> bool {
        !self.frameworks.is_empty() || !self.libraries.is_empty()
    }
}

/// Informational schedule estimate derived from a generated task graph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Timeline {
    /// Sum of every task's estimated hours.
    pub total_effort_hours: f64,
    /// Length of the critical path in hours.
    pub critical_path_hours: f64,
    /// Working days needed for the critical path, rounded up.
    pub estimated_days: u32,
}

/// Top-level description of a set of components to implement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub requirements: Requirements,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_timeline: Option<Timeline>,
    #[serde(default)]
    pub status: PlanStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plan {
    /// Create an empty draft plan with a fresh id and timestamps.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            components: Vec::new(),
            requirements: Requirements::default(),
            estimated_timeline: None,
            status: PlanStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style helper to attach components at construction time.
    pub fn with_components(mut self, components: Vec<Component>) -> Self {
        self.components = components;
        self
    }

    /// Builder-style helper to attach aggregate requirements.
    pub fn with_requirements(mut self, requirements: Requirements) -> Self {
        self.requirements = requirements;
        self
    }

    /// Look up a component by name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// A generated unit of scheduled work.
///
/// `status` is kept as a string so that records coming back from a
/// persistence collaborator can be validated rather than rejected at
/// deserialization time. Use [`Task::status`] for the parsed value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: TaskKind,
    /// Owning component name, or [`SETUP_COMPONENT`].
    pub component: String,
    /// Ids of tasks that must complete first.
    #[serde(default)]
    pub dependencies: BTreeSet<Uuid>,
    pub estimated_hours: f64,
    pub priority: i32,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a `todo` task with a fresh id and no dependencies.
    pub fn new(
        kind: TaskKind,
        name: impl Into<String>,
        component: impl Into<String>,
        estimated_hours: f64,
        priority: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            kind,
            component: component.into(),
            dependencies: BTreeSet::new(),
            estimated_hours,
            priority,
            status: TaskStatus::Todo.to_string(),
            assignee: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Parsed task status.
    pub fn status(&self) -> Result<TaskStatus, TaskStatusParseError> {
        self.status.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_round_trip_through_strings() {
        for s in ["todo", "in_progress", "completed", "blocked"] {
            let status: TaskStatus = s.parse().unwrap();
            assert_eq!(status.to_string(), s);
        }
        for s in ["draft", "approved", "in_progress", "completed", "archived"] {
            let status: PlanStatus = s.parse().unwrap();
            assert_eq!(status.to_string(), s);
        }
    }

    #[test]
    fn level_parsing_is_exact() {
        assert_eq!("high".parse::<EffortLevel>().unwrap(), EffortLevel::High);
        assert!("High".parse::<EffortLevel>().is_err());
        assert!("urgent".parse::<PriorityLevel>().is_err());

        let err = "huge".parse::<EffortLevel>().unwrap_err();
        assert_eq!(err.to_string(), "invalid effort level: \"huge\"");
    }

    #[test]
    fn task_status_transitions() {
        use TaskStatus::*;
        assert!(Todo.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Completed.can_transition_to(InProgress));
        assert!(Blocked.can_transition_to(Todo));
        assert!(Todo.can_transition_to(Todo));

        assert!(!Todo.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Todo));
        assert!(!Blocked.can_transition_to(Completed));
    }

    #[test]
    fn component_defaults_when_deserialized() {
        let component: Component = serde_json::from_str(r#"{"name": "encoder"}"#).unwrap();
        assert_eq!(component.estimated_effort, "medium");
        assert_eq!(component.priority, "medium");
        assert!(component.dependencies.is_empty());
        assert_eq!(component.status, ComponentStatus::Planned);
        assert_eq!(component.effort_level(), Some(EffortLevel::Medium));
    }

    #[test]
    fn unknown_levels_are_kept_verbatim() {
        let mut component = Component::new("decoder", "");
        component.estimated_effort = "enormous".to_string();
        assert_eq!(component.effort_level(), None);
        assert_eq!(component.priority_level(), Some(PriorityLevel::Medium));
    }

    #[test]
    fn requirements_setup_detection() {
        let mut req = Requirements::default();
        assert!(req.is_empty());
        assert!(!req.needs_setup());

        req.datasets.push("imagenet".to_string());
        assert!(!req.is_empty());
        assert!(!req.needs_setup());

        req.libraries.push("numpy".to_string());
        assert!(req.needs_setup());
    }

    #[test]
    fn each_plan_gets_its_own_identity_and_timestamp() {
        let a = Plan::new("a", "");
        let b = Plan::new("b", "");
        assert_ne!(a.id, b.id);
        assert!(b.created_at >= a.created_at);
        assert_eq!(a.status, PlanStatus::Draft);
    }

    #[test]
    fn task_status_accessor_reports_garbage() {
        let mut task = Task::new(TaskKind::Test, "Test x", "x", 4.0, 3);
        assert_eq!(task.status().unwrap(), TaskStatus::Todo);
        task.status = "paused".to_string();
        assert!(task.status().is_err());
    }
}
