// smartsales/src/commands/prepare.rs
//
// USE CASE: Clean the raw CSV files into prepared files.

use std::path::PathBuf;

use anyhow::Context;
use smartsales_core::application::{PrepareOutcome, prepare_all};
use smartsales_core::domain::project::{ALL_ENTITIES, Entity};

pub fn execute(project_dir: PathBuf, entity: Option<Entity>) -> anyhow::Result<()> {
    let config = super::load_config(&project_dir)?;
    let paths = config.resolve_paths(&project_dir);

    let entities = match entity {
        Some(e) => vec![e],
        None => ALL_ENTITIES.to_vec(),
    };

    println!("🧹 Preparing {} dataset(s)...", entities.len());
    let batch = prepare_all(&entities, &paths, &config.cleaning);

    for outcome in &batch.outcomes {
        print_outcome(outcome);
    }
    for (entity, e) in &batch.failures {
        println!("   ❌ {:<9} {}", entity.name(), e);
    }
    batch
        .into_result()
        .with_context(|| format!("Data preparation failed in {:?}", paths.raw_dir))?;

    println!("\n✨ Prepared files written to {}", paths.prepared_dir.display());
    Ok(())
}

fn print_outcome(outcome: &PrepareOutcome) {
    let r = &outcome.report;
    println!(
        "   ✅ {:<9} {} -> {} rows (duplicates: {}, filled: {}, dropped: {}, outliers: {})",
        outcome.entity.name(),
        r.rows_in,
        r.rows_out,
        r.duplicates_removed,
        r.cells_filled,
        r.rows_dropped_missing,
        r.outliers_removed
    );
    if !r.validation.is_clean() {
        println!(
            "      ⚠️  {} null cell(s) and {} duplicate row(s) remain",
            r.validation.remaining_nulls, r.validation.remaining_duplicates
        );
    }
}
