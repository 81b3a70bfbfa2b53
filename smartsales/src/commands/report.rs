// smartsales/src/commands/report.rs
//
// USE CASE: Answer the reporting goals from the OLAP cube.

use std::path::PathBuf;

use anyhow::Context;
use smartsales_core::application::{ReportSummary, run_reports};
use smartsales_core::domain::reporting::ReportGoal;
use smartsales_core::infrastructure::adapters::DuckDBAnalytics;

pub fn execute(project_dir: PathBuf, goals: Vec<ReportGoal>) -> anyhow::Result<()> {
    let mut config = super::load_config(&project_dir)?;
    let paths = config.resolve_paths(&project_dir);
    if !goals.is_empty() {
        config.reporting.goals = goals;
    }

    println!("📊 Querying cube {} (DuckDB 🦆)", paths.cube.display());
    let analytics = DuckDBAnalytics::in_memory().context("Failed to initialize DuckDB")?;
    let summary = run_reports(&analytics, &paths, &config.reporting)
        .with_context(|| format!("Reporting failed for cube {:?}", paths.cube))?;

    print_summary(&summary);

    if summary.has_failures() {
        anyhow::bail!("❌ One or more reporting goals failed");
    }
    println!("\n✨ Results written to {}", paths.results_dir.display());
    Ok(())
}

pub(crate) fn print_summary(summary: &ReportSummary) {
    for goal in &summary.goals {
        match &goal.error {
            None => println!("   ✅ {:<18} {} rows", goal.goal.name(), goal.rows),
            Some(e) => println!("   ❌ {:<18} {}", goal.goal.name(), e),
        }
    }
    if let Some(day) = &summary.lowest_revenue_day {
        println!("   📉 Lowest revenue day: {}", day);
    }
}
