// smartsales/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use smartsales_core::domain::project::{Entity, RowErrorPolicy};
use smartsales_core::domain::reporting::ReportGoal;
use smartsales_core::domain::warehouse::WarehouseTable;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "smartsales")]
#[command(about = "Sales data preparation, warehouse load and OLAP reporting", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Show debug logs
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🧹 Cleans the raw CSV files into data/prepared
    Prepare {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Prepare a single dataset only
        #[arg(long, short, value_enum)]
        entity: Option<EntityArg>,
    },

    /// 🏛️  Reloads the SQLite warehouse from the prepared files
    Load {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Exit with error if any table or row failed to load
        #[arg(long)]
        strict: bool,

        /// Overrides `load.on_row_error` from smartsales.yaml
        #[arg(long, value_enum)]
        on_row_error: Option<RowErrorArg>,
    },

    /// 📊 Answers the reporting goals from the OLAP cube
    Report {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Run only these goals (ex: "weekday_revenue")
        #[arg(long, short)]
        goal: Vec<ReportGoal>,
    },

    /// 🚀 Runs the whole pipeline (prepare -> load -> report)
    Run {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Exit with error if any stage reported a failure
        #[arg(long)]
        strict: bool,
    },

    /// 🔍 Inspects a warehouse table (schema + sample rows)
    Inspect {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// customer, product or sale
        #[arg(long, short)]
        table: WarehouseTable,

        /// Number of sample rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EntityArg {
    Customers,
    Products,
    Sales,
}

impl From<EntityArg> for Entity {
    fn from(arg: EntityArg) -> Self {
        match arg {
            EntityArg::Customers => Entity::Customers,
            EntityArg::Products => Entity::Products,
            EntityArg::Sales => Entity::Sales,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RowErrorArg {
    SkipRow,
    AbortTable,
}

impl From<RowErrorArg> for RowErrorPolicy {
    fn from(arg: RowErrorArg) -> Self {
        match arg {
            RowErrorArg::SkipRow => RowErrorPolicy::SkipRow,
            RowErrorArg::AbortTable => RowErrorPolicy::AbortTable,
        }
    }
}
