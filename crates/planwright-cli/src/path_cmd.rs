//! `planwright path <record>`: recompute and print the critical path.

use std::path::Path;

use anyhow::{Context, Result};

use planwright_core::CriticalPathAnalyzer;

pub fn run_path(file: &Path, tolerance: f64, json: bool, pretty: bool) -> Result<()> {
    let record = crate::record_io::read_record(file)?;
    let path = CriticalPathAnalyzer::new(tolerance)
        .analyze(&record.tasks)
        .with_context(|| format!("failed to analyze tasks in {}", file.display()))?;

    if json {
        return crate::record_io::write_json(&path, None, pretty);
    }

    if path.is_empty() {
        println!("No tasks; critical path is empty.");
        return Ok(());
    }

    let name_w = path
        .task_ids
        .iter()
        .filter_map(|id| record.task(*id))
        .map(|t| t.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    println!("{:>3}  {:<name_w$}  {:>8}  {:>10}", "#", "TASK", "HOURS", "FINISH");
    for (i, id) in path.task_ids.iter().enumerate() {
        let Some(task) = record.task(*id) else {
            continue;
        };
        let finish = path.earliest_completion.get(id).copied().unwrap_or_default();
        println!(
            "{:>3}  {:<name_w$}  {:>8.1}  {:>10.1}",
            i + 1,
            task.name,
            task.estimated_hours,
            finish
        );
    }
    println!();
    println!("Project completion: {:.1}h", path.project_completion);

    if path.task_ids != record.critical_path {
        eprintln!("note: stored critical path differs from the recomputed one");
    }
    Ok(())
}
