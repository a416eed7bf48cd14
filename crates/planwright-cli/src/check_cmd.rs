//! `planwright check <record>`: re-run the validator over a stored record.

use std::path::Path;

use anyhow::{Result, bail};

use planwright_core::{PlanSummary, validate_generation};

/// Print every issue and a progress summary. Fails when any error-severity
/// issue is present.
pub fn run_check(file: &Path) -> Result<()> {
    let record = crate::record_io::read_record(file)?;
    let summary = validate_generation(&record.plan, &record.tasks, &record.critical_path);
    let progress = PlanSummary::from_record(&record);

    println!("Plan {} ({})", progress.plan_id, progress.title);
    println!("  Status:     {}", progress.status);
    println!("  Tasks:      {}", progress.total_tasks);
    for (status, count) in &progress.tasks_by_status {
        println!("    {status:<12} {count}");
    }
    println!(
        "  Hours:      {:.1} total, {:.1} completed ({:.0}%)",
        progress.total_hours,
        progress.completed_hours,
        progress.progress() * 100.0
    );
    println!();

    if summary.issues.is_empty() {
        println!("No issues found.");
        return Ok(());
    }
    for issue in &summary.issues {
        println!("  {issue}");
    }

    let errors = summary.errors().count();
    if errors > 0 {
        bail!("{} has {errors} validation error(s)", file.display());
    }
    println!();
    println!("{} warning(s), no errors.", summary.issues.len());
    Ok(())
}
