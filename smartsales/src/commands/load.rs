// smartsales/src/commands/load.rs
//
// USE CASE: Reload the SQLite warehouse from the prepared files.

use std::path::PathBuf;

use anyhow::Context;
use smartsales_core::application::{LoadReport, TableStatus, run_warehouse_load};
use smartsales_core::domain::project::RowErrorPolicy;
use smartsales_core::infrastructure::adapters::SqliteWarehouse;

pub fn execute(project_dir: PathBuf, strict: bool, on_row_error: Option<RowErrorPolicy>) -> anyhow::Result<()> {
    let config = super::load_config(&project_dir)?;
    let paths = config.resolve_paths(&project_dir);
    let policy = on_row_error.unwrap_or(config.load.on_row_error);

    println!("🏛️  Loading warehouse {} (SQLite)", paths.warehouse.display());
    let report = {
        let warehouse = SqliteWarehouse::open(&paths.warehouse)
            .with_context(|| format!("Failed to open warehouse at {:?}", paths.warehouse))?;
        run_warehouse_load(&warehouse, &paths, policy).context("Warehouse load failed")?
    };

    print_report(&report);

    if report.has_failures() {
        if strict || config.load.strict {
            anyhow::bail!("❌ Strict mode: warehouse load reported failures");
        }
        println!("\n⚠️  Warehouse loaded with failures ({} rows inserted)", report.rows_inserted());
    } else {
        println!("\n✨ SUCCESS! {} rows loaded", report.rows_inserted());
    }
    Ok(())
}

pub(crate) fn print_report(report: &LoadReport) {
    for (table, outcome) in &report.tables {
        let icon = match outcome.status {
            TableStatus::Loaded => "✅",
            TableStatus::Partial => "⚠️ ",
            TableStatus::Failed => "❌",
        };
        println!(
            "   {} {:<8} {}/{} rows",
            icon,
            table.name(),
            outcome.rows_inserted,
            outcome.rows_read
        );
        if !outcome.ignored_columns.is_empty() {
            println!("      ignored columns: [{}]", outcome.ignored_columns.join(", "));
        }
        for failure in &outcome.failures {
            println!("      row {}: {}", failure.row, failure.message);
        }
        if let Some(error) = &outcome.error {
            println!("      {}", error);
        }
    }
}
