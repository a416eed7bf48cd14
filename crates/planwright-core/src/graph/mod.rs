//! Task graph construction and critical path analysis.

pub mod builder;
pub mod critical_path;
pub mod topo;

use uuid::Uuid;

use planwright_model::{Task, TaskKind, Timeline};

use crate::config::PlanningConfig;

pub use builder::{TaskGraphBuilder, build_task_graph};
pub use critical_path::{CriticalPath, CriticalPathAnalyzer};
pub use topo::topological_order;

/// The set of tasks produced by one generation run, in creation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskGraph {
    tasks: Vec<Task>,
}

impl TaskGraph {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// The bootstrap task, if the plan needed one.
    pub fn setup_task(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| t.kind == TaskKind::Setup)
    }

    /// The task of the given kind owned by `component`.
    pub fn task_for(&self, component: &str, kind: TaskKind) -> Option<&Task> {
        self.tasks
            .iter()
            .find(|t| t.kind == kind && t.component == component)
    }

    /// Sum of every task's estimated hours.
    pub fn total_hours(&self) -> f64 {
        self.tasks.iter().map(|t| t.estimated_hours).sum()
    }

    /// Derive the informational timeline for this graph and its critical path.
    pub fn timeline(&self, path: &CriticalPath, config: &PlanningConfig) -> Timeline {
        let critical_path_hours = path.project_completion;
        let estimated_days = if config.hours_per_day > 0.0 {
            (critical_path_hours / config.hours_per_day).ceil().max(0.0) as u32
        } else {
            0
        };
        Timeline {
            total_effort_hours: self.total_hours(),
            critical_path_hours,
            estimated_days,
        }
    }
}

impl From<Vec<Task>> for TaskGraph {
    fn from(tasks: Vec<Task>) -> Self {
        Self::new(tasks)
    }
}
