// smartsales/src/commands/run.rs
//
// USE CASE: Run the full pipeline.

use std::path::PathBuf;

use anyhow::Context;
use smartsales_core::application::run_pipeline;

pub fn execute(project_dir: PathBuf, strict: bool) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    let config = super::load_config(&project_dir)?;
    let paths = config.resolve_paths(&project_dir);

    println!("🚀 Running pipeline (prepare -> load -> report)...");
    let results = run_pipeline(&project_dir, &config).context("CRITICAL PIPELINE ERROR")?;

    for outcome in &results.prepare {
        println!(
            "   🧹 {:<9} {} -> {} rows",
            outcome.entity.name(),
            outcome.report.rows_in,
            outcome.report.rows_out
        );
    }
    super::load::print_report(&results.load);
    match &results.report {
        Some(summary) => super::report::print_summary(summary),
        None => println!("   ⏭️  Reporting skipped: no cube at {}", paths.cube.display()),
    }
    println!("   📝 Run results: {}", paths.run_results().display());

    if results.success {
        println!("\n✨ SUCCESS! Pipeline finished in {:.2?}", start.elapsed());
        return Ok(());
    }
    if strict || config.load.strict {
        anyhow::bail!("❌ FAILURE. Pipeline reported failures (strict mode)");
    }
    println!("\n⚠️  Pipeline finished with failures in {:.2?}", start.elapsed());
    Ok(())
}
