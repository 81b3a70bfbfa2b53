// smartsales-core/src/application/report.rs

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::domain::error::DomainError;
use crate::domain::project::{PipelinePaths, ReportingConfig};
use crate::domain::reporting::{CubeColumns, ReportGoal};
use crate::domain::table::Table;
use crate::error::SmartSalesError;
use crate::infrastructure::csv::save_table;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::analytics::AnalyticsConnector;

/// Name of the view the cube file is registered under.
pub const CUBE_VIEW: &str = "olap_cube";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalSummary {
    pub goal: ReportGoal,
    pub rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    pub goals: Vec<GoalSummary>,
    /// First row of `weekday_revenue`, when that goal ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lowest_revenue_day: Option<String>,
}

impl ReportSummary {
    pub fn has_failures(&self) -> bool {
        self.goals.iter().any(|g| g.error.is_some())
    }
}

/// Registers the cube file as `CUBE_VIEW`. A missing file is fatal.
pub fn register_cube(analytics: &dyn AnalyticsConnector, cube: &Path) -> Result<(), SmartSalesError> {
    if !cube.exists() {
        return Err(InfrastructureError::NotFound {
            path: cube.to_path_buf(),
        }
        .into());
    }
    analytics.register_source(CUBE_VIEW, &cube.to_string_lossy())?;
    info!(path = %cube.display(), "OLAP cube registered");
    Ok(())
}

/// Answers one goal from the registered cube.
pub fn run_goal(
    analytics: &dyn AnalyticsConnector,
    goal: ReportGoal,
    columns: &CubeColumns,
) -> Result<Table, SmartSalesError> {
    let live = analytics.fetch_columns(CUBE_VIEW)?;
    for required in goal.required_columns(columns) {
        if !live.iter().any(|c| c.name == required) {
            return Err(DomainError::missing_column(goal.name(), required).into());
        }
    }
    Ok(analytics.query_table(&goal.sql(columns, CUBE_VIEW), goal.output_columns())?)
}

/// Day of the week with the smallest summed revenue.
pub fn lowest_revenue_day(
    analytics: &dyn AnalyticsConnector,
    columns: &CubeColumns,
) -> Result<Option<String>, SmartSalesError> {
    let table = run_goal(analytics, ReportGoal::WeekdayRevenue, columns)?;
    Ok(table.cell(0, 0).map(str::to_string))
}

/// Runs every configured goal and writes `<results_dir>/<goal>.csv`.
/// A failing goal is recorded and does not stop the others.
pub fn run_reports(
    analytics: &dyn AnalyticsConnector,
    paths: &PipelinePaths,
    config: &ReportingConfig,
) -> Result<ReportSummary, SmartSalesError> {
    register_cube(analytics, &paths.cube)?;

    let mut summary = ReportSummary::default();
    for goal in &config.goals {
        let outcome = run_goal(analytics, *goal, &config.columns).and_then(|table| {
            let output = paths.result_file(*goal);
            save_table(&table, &output)?;
            Ok((table, output))
        });

        match outcome {
            Ok((table, output)) => {
                if *goal == ReportGoal::WeekdayRevenue {
                    summary.lowest_revenue_day = table.cell(0, 0).map(str::to_string);
                }
                info!(goal = goal.name(), rows = table.len(), "Report written");
                summary.goals.push(GoalSummary {
                    goal: *goal,
                    rows: table.len(),
                    output: Some(output),
                    error: None,
                });
            }
            Err(e) => {
                error!(goal = goal.name(), error = %e, "Report goal failed");
                summary.goals.push(GoalSummary {
                    goal: *goal,
                    rows: 0,
                    output: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    // purchase_frequency reports the weakest weekday alongside its monthly figures.
    if summary.lowest_revenue_day.is_none() && config.goals.contains(&ReportGoal::PurchaseFrequency) {
        match lowest_revenue_day(analytics, &config.columns) {
            Ok(day) => summary.lowest_revenue_day = day,
            Err(e) => warn!(error = %e, "Lowest revenue day unavailable"),
        }
    }
    if let Some(day) = &summary.lowest_revenue_day {
        info!(day = day.as_str(), "Lowest revenue day of the week");
    }
    Ok(summary)
}
