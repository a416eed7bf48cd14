//! Planning facade.
//!
//! Orchestrates validate -> build tasks -> analyze critical path -> validate
//! again -> hand the record to the persistence collaborator. This is the only
//! part of the crate that knows about a [`PlanStore`].

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use planwright_model::{GenerationRecord, Plan, Task, Understanding, ValidationIssue};

use super::summary::PlanSummary;
use super::understanding::plan_from_understanding;
use crate::config::PlanningConfig;
use crate::error::{GraphError, Phase, PlanningError, Result};
use crate::estimate::{EffortEstimator, HeuristicEstimator, HeuristicPriority, PriorityCalculator};
use crate::graph::{CriticalPath, CriticalPathAnalyzer, TaskGraph, TaskGraphBuilder};
use crate::store::PlanStore;
use crate::validate::{validate_generation, validate_plan, validate_understanding};

/// Turns understanding records and plans into persisted generation records.
///
/// Holds no per-generation state, so one `Planner` can serve concurrent
/// callers.
pub struct Planner {
    config: PlanningConfig,
    estimator: Box<dyn EffortEstimator>,
    prioritizer: Box<dyn PriorityCalculator>,
    pub(super) store: Arc<dyn PlanStore>,
}

impl Planner {
    /// Create a planner with the default configuration and heuristics.
    pub fn new(store: Arc<dyn PlanStore>) -> Self {
        Self::with_config(store, PlanningConfig::default())
    }

    /// Create a planner with the default heuristics tuned by `config`.
    pub fn with_config(store: Arc<dyn PlanStore>, config: PlanningConfig) -> Self {
        Self {
            estimator: Box::new(HeuristicEstimator::new(config.clone())),
            prioritizer: Box::new(HeuristicPriority),
            config,
            store,
        }
    }

    /// Replace the effort estimator.
    pub fn with_estimator(mut self, estimator: impl EffortEstimator + 'static) -> Self {
        self.estimator = Box::new(estimator);
        self
    }

    /// Replace the priority calculator.
    pub fn with_prioritizer(mut self, prioritizer: impl PriorityCalculator + 'static) -> Self {
        self.prioritizer = Box::new(prioritizer);
        self
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    /// Validate an understanding record, map it to a plan and generate.
    ///
    /// An understanding with error-severity issues is rejected before a plan
    /// is built.
    pub async fn generate(&self, understanding: &Understanding) -> Result<GenerationRecord> {
        let issues = validate_understanding(understanding);
        if issues.iter().any(ValidationIssue::is_error) {
            warn!(issues = issues.len(), "rejecting understanding record");
            return Err(PlanningError::Validation {
                plan_id: None,
                issues,
            });
        }
        self.generate_from_plan(plan_from_understanding(understanding))
            .await
    }

    /// Generate tasks and the critical path for `plan` and persist the record.
    ///
    /// Store failures are returned as [`PlanningError::Store`] unchanged.
    pub async fn generate_from_plan(&self, plan: Plan) -> Result<GenerationRecord> {
        let record = self.build_record(plan)?;
        self.store.save(&record).await?;

        info!(
            plan_id = %record.plan_id(),
            tasks = record.tasks.len(),
            critical_path = record.critical_path.len(),
            warnings = record.validation.warnings().count(),
            "generated plan"
        );
        Ok(record)
    }

    /// Run one generation without touching the store.
    ///
    /// Plan-level errors (including circular component dependencies) reject
    /// the plan before any task is built. Warnings are kept in the record's
    /// validation summary.
    pub fn build_record(&self, mut plan: Plan) -> Result<GenerationRecord> {
        let plan_issues = validate_plan(&plan);
        if plan_issues.iter().any(ValidationIssue::is_error) {
            warn!(plan_id = %plan.id, issues = plan_issues.len(), "rejecting plan");
            return Err(PlanningError::Validation {
                plan_id: Some(plan.id),
                issues: plan_issues,
            });
        }
        for issue in &plan_issues {
            warn!(plan_id = %plan.id, code = %issue.code, "{}", issue.message);
        }

        let graph = self.build_tasks(&plan);
        let path = self
            .critical_path(graph.tasks())
            .map_err(|source| PlanningError::Generation {
                plan_id: plan.id,
                phase: Phase::CriticalPath,
                source,
            })?;
        plan.estimated_timeline = Some(graph.timeline(&path, &self.config));

        let tasks = graph.into_tasks();
        let validation = validate_generation(&plan, &tasks, &path.task_ids);
        if !validation.is_valid() {
            return Err(PlanningError::Validation {
                plan_id: Some(plan.id),
                issues: validation.issues,
            });
        }

        debug!(
            plan_id = %plan.id,
            project_completion = path.project_completion,
            "critical path computed"
        );

        Ok(GenerationRecord {
            plan,
            tasks,
            critical_path: path.task_ids,
            validation,
        })
    }

    /// Build the task graph for `plan` with this planner's heuristics.
    pub fn build_tasks(&self, plan: &Plan) -> TaskGraph {
        TaskGraphBuilder::new(
            self.estimator.as_ref(),
            self.prioritizer.as_ref(),
            &self.config,
        )
        .build(plan)
    }

    /// Analyze `tasks` with the configured tolerance.
    pub fn critical_path(&self, tasks: &[Task]) -> std::result::Result<CriticalPath, GraphError> {
        CriticalPathAnalyzer::new(self.config.tolerance).analyze(tasks)
    }

    /// Fetch a stored record or fail with [`PlanningError::PlanNotFound`].
    pub async fn load(&self, plan_id: Uuid) -> Result<GenerationRecord> {
        self.store
            .load(plan_id)
            .await?
            .ok_or(PlanningError::PlanNotFound { id: plan_id })
    }

    /// Task counts and hours for a stored plan.
    pub async fn summary(&self, plan_id: Uuid) -> Result<PlanSummary> {
        Ok(PlanSummary::from_record(&self.load(plan_id).await?))
    }
}
