//! Data model for planwright: components, plans, tasks, the understanding
//! input record, and the generation record handed to persistence.

pub mod models;
pub mod record;
pub mod understanding;

pub use models::{
    Component, ComponentStatus, EffortLevel, Plan, PlanStatus, PriorityLevel, Requirements,
    SETUP_COMPONENT, Task, TaskKind, TaskStatus, Timeline,
};
pub use record::{GenerationRecord, IssueCode, Severity, ValidationIssue, ValidationSummary};
pub use understanding::{
    AlgorithmDescriptor, ArchitectureComponent, Evaluation, ImplementationDetails, Understanding,
};
