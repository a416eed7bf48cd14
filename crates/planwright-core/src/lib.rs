//! Planning core for planwright.
//!
//! Turns a component-level [`Plan`](planwright_model::Plan) into a set of
//! Setup/Implement/Test/Document tasks, computes the critical path through
//! them, and validates the result. [`Planner`] ties these together and hands
//! finished records to a [`PlanStore`].

pub mod config;
pub mod error;
pub mod estimate;
pub mod graph;
pub mod plan;
pub mod store;
pub mod validate;

pub use config::{EffortHours, PlanningConfig};
pub use error::{GraphError, Phase, PlanningError, Result};
pub use estimate::{EffortEstimator, HeuristicEstimator, HeuristicPriority, PriorityCalculator};
pub use graph::{CriticalPath, CriticalPathAnalyzer, TaskGraph, TaskGraphBuilder};
pub use plan::{PlanSummary, PlanUpdate, Planner, TaskUpdate, plan_from_understanding};
pub use store::{MemoryStore, PlanStore};
pub use validate::{
    validate_critical_path, validate_generation, validate_plan, validate_tasks,
    validate_understanding,
};
