//! Task graph builder.
//!
//! Turns the components of a [`Plan`] into Setup/Implement/Test/Document
//! tasks and wires their dependency edges. The builder carries no state
//! between calls: every [`TaskGraphBuilder::build`] works on locals only and
//! every task receives a fresh random id, so one builder may be shared by
//! concurrent callers.

use std::collections::HashMap;

use tracing::{debug, warn};

use planwright_model::{Plan, SETUP_COMPONENT, Task, TaskKind};

use super::TaskGraph;
use crate::config::PlanningConfig;
use crate::estimate::{
    EffortEstimator, HeuristicEstimator, HeuristicPriority, MAX_PRIORITY, PriorityCalculator,
};

/// Builds a [`TaskGraph`] from a plan using the supplied estimators.
pub struct TaskGraphBuilder<'a> {
    estimator: &'a dyn EffortEstimator,
    prioritizer: &'a dyn PriorityCalculator,
    config: &'a PlanningConfig,
}

impl<'a> TaskGraphBuilder<'a> {
    pub fn new(
        estimator: &'a dyn EffortEstimator,
        prioritizer: &'a dyn PriorityCalculator,
        config: &'a PlanningConfig,
    ) -> Self {
        Self {
            estimator,
            prioritizer,
            config,
        }
    }

    /// Generate the task graph for `plan`.
    ///
    /// 1. A Setup task when frameworks or libraries are required.
    /// 2. Implement, Test and Document tasks per component.
    /// 3. Implement -> Implement edges for declared component dependencies.
    ///
    /// Never fails. A dependency name with no matching component is skipped.
    pub fn build(&self, plan: &Plan) -> TaskGraph {
        let mut tasks: Vec<Task> = Vec::with_capacity(plan.components.len() * 3 + 1);

        let setup_id = if plan.requirements.needs_setup() {
            let mut setup = Task::new(
                TaskKind::Setup,
                "Setup",
                SETUP_COMPONENT,
                self.config.setup_hours,
                MAX_PRIORITY,
            );
            setup.description = setup_description(plan);
            let id = setup.id;
            tasks.push(setup);
            Some(id)
        } else {
            None
        };

        // Position of each component's Implement task, aligned with
        // `plan.components`, plus a name lookup (first declaration wins).
        let mut implement_positions = Vec::with_capacity(plan.components.len());
        let mut implement_by_name: HashMap<&str, usize> = HashMap::new();

        for component in &plan.components {
            let priority = self.prioritizer.priority(component);
            let implement_hours = self.estimator.estimate(component);

            let mut implement = Task::new(
                TaskKind::Implement,
                format!("Implement {}", component.name),
                &component.name,
                implement_hours,
                priority,
            );
            implement.description = if component.description.is_empty() {
                format!("Implement the {} component", component.name)
            } else {
                component.description.clone()
            };
            implement.dependencies.extend(setup_id);

            let test_hours =
                (implement_hours * self.config.test_ratio).max(self.config.min_test_hours);
            let mut test = Task::new(
                TaskKind::Test,
                format!("Test {}", component.name),
                &component.name,
                test_hours,
                priority,
            );
            test.description = format!("Write and run tests for {}", component.name);
            test.dependencies.insert(implement.id);

            let mut document = Task::new(
                TaskKind::Document,
                format!("Document {}", component.name),
                &component.name,
                self.config.document_hours,
                priority,
            );
            document.description = format!("Write documentation for {}", component.name);
            document.dependencies.insert(implement.id);

            let position = tasks.len();
            implement_positions.push(position);
            implement_by_name
                .entry(component.name.as_str())
                .or_insert(position);

            tasks.push(implement);
            tasks.push(test);
            tasks.push(document);
        }

        for (component, &position) in plan.components.iter().zip(&implement_positions) {
            for dependency in &component.dependencies {
                match implement_by_name.get(dependency.as_str()) {
                    Some(&dep_position) => {
                        let dep_id = tasks[dep_position].id;
                        tasks[position].dependencies.insert(dep_id);
                    }
                    None => warn!(
                        plan_id = %plan.id,
                        component = %component.name,
                        dependency = %dependency,
                        "skipping dependency on unknown component"
                    ),
                }
            }
        }

        debug!(
            plan_id = %plan.id,
            components = plan.components.len(),
            tasks = tasks.len(),
            setup = setup_id.is_some(),
            "built task graph"
        );

        TaskGraph::new(tasks)
    }
}

/// Build a task graph with the default heuristics.
pub fn build_task_graph(plan: &Plan, config: &PlanningConfig) -> TaskGraph {
    let estimator = HeuristicEstimator::new(config.clone());
    TaskGraphBuilder::new(&estimator, &HeuristicPriority, config).build(plan)
}

fn setup_description(plan: &Plan) -> String {
    let tooling: Vec<&str> = plan
        .requirements
        .frameworks
        .iter()
        .chain(&plan.requirements.libraries)
        .map(String::as_str)
        .collect();
    format!(
        "Set up the development environment and install: {}",
        tooling.join(", ")
    )
}
