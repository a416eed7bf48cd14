//! `planwright generate <understanding>`: run the planning facade on an
//! understanding file and emit the generation record.

use std::path::Path;

use anyhow::{Context, Result};

use planwright_core::Planner;

pub async fn run_generate(
    planner: &Planner,
    file: &Path,
    output: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let understanding = crate::record_io::read_understanding(file)?;

    let record = planner
        .generate(&understanding)
        .await
        .with_context(|| format!("failed to generate a plan from {}", file.display()))?;

    eprintln!("Plan generated.");
    eprintln!("  Plan ID:        {}", record.plan_id());
    eprintln!("  Title:          {}", record.plan.title);
    eprintln!("  Components:     {}", record.plan.components.len());
    eprintln!("  Tasks:          {}", record.tasks.len());
    eprintln!("  Critical path:  {} tasks", record.critical_path.len());
    if let Some(timeline) = &record.plan.estimated_timeline {
        eprintln!(
            "  Estimate:       {:.1}h on the critical path, {:.1}h total, ~{} days",
            timeline.critical_path_hours, timeline.total_effort_hours, timeline.estimated_days
        );
    }
    let warnings: Vec<_> = record.validation.warnings().collect();
    if !warnings.is_empty() {
        eprintln!();
        eprintln!("Warnings:");
        for warning in warnings {
            eprintln!("  - {warning}");
        }
    }

    crate::record_io::write_json(&record, output, pretty)
}
