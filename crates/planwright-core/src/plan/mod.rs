//! Plan construction, the planning facade and partial updates.

pub mod service;
pub mod summary;
pub mod understanding;
pub mod update;

pub use service::Planner;
pub use summary::PlanSummary;
pub use understanding::plan_from_understanding;
pub use update::{PlanUpdate, TaskUpdate};
