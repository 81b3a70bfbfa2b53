// smartsales/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use smartsales_core::SmartSalesError;
use smartsales_core::infrastructure::error::InfrastructureError;
use std::process::ExitCode;
use tracing::Level;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr, progress lines to stdout.
    // smartsales -v run ... to see the details
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Prepare {
            project_dir,
            entity,
        } => commands::prepare::execute(project_dir, entity.map(Into::into)),

        Commands::Load {
            project_dir,
            strict,
            on_row_error,
        } => commands::load::execute(project_dir, strict, on_row_error.map(Into::into)),

        Commands::Report { project_dir, goal } => commands::report::execute(project_dir, goal),

        Commands::Run {
            project_dir,
            strict,
        } => commands::run::execute(project_dir, strict),

        Commands::Inspect {
            project_dir,
            table,
            limit,
        } => commands::inspect::execute(project_dir, table, limit),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(e);
            ExitCode::FAILURE
        }
    }
}

/// Core errors carry diagnostic codes; render those through miette.
fn report_error(err: anyhow::Error) {
    let headline = err.to_string();
    let err = match err.downcast::<SmartSalesError>() {
        Ok(core) => {
            eprintln!("\n💥 {}\n{:?}", headline, miette::Report::new(core));
            return;
        }
        Err(err) => err,
    };
    match err.downcast::<InfrastructureError>() {
        Ok(infra) => eprintln!("\n💥 {}\n{:?}", headline, miette::Report::new(infra)),
        Err(other) => eprintln!("\n💥 {:#}", other),
    }
}
