//! `planwright update-plan` and `planwright update-task`.
//!
//! The record file is loaded into an in-memory store, the update runs
//! through the planning facade, and the accepted record is written out.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use uuid::Uuid;

use planwright_core::{MemoryStore, PlanUpdate, Planner, PlanningConfig, TaskUpdate};

/// Planner over a store seeded with the record in `file`.
async fn planner_for(file: &Path, config: &PlanningConfig) -> Result<(Planner, Uuid)> {
    let record = crate::record_io::read_record(file)?;
    let plan_id = record.plan_id();
    let store = Arc::new(MemoryStore::new());
    store.insert(record).await;
    Ok((Planner::with_config(store, config.clone()), plan_id))
}

pub async fn run_update_plan(
    file: &Path,
    update: PlanUpdate,
    config: &PlanningConfig,
    output: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let (planner, plan_id) = planner_for(file, config).await?;
    let record = planner
        .update_plan(plan_id, update)
        .await
        .with_context(|| format!("failed to update plan {plan_id}"))?;
    eprintln!("Plan {plan_id} updated.");
    crate::record_io::write_json(&record, output, pretty)
}

pub async fn run_update_task(
    file: &Path,
    task_id: &str,
    update: TaskUpdate,
    config: &PlanningConfig,
    output: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let task_id =
        Uuid::parse_str(task_id).with_context(|| format!("invalid task ID: {task_id}"))?;
    let (planner, plan_id) = planner_for(file, config).await?;
    let record = planner
        .update_task(plan_id, task_id, update)
        .await
        .with_context(|| format!("failed to update task {task_id}"))?;
    if let Some(task) = record.task(task_id) {
        eprintln!("Task {task_id} ({}) updated: {}", task.name, task.status);
    }
    crate::record_io::write_json(&record, output, pretty)
}
