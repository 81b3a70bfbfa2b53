// smartsales-core/src/application/pipeline.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::application::load::{LoadReport, run_warehouse_load};
use crate::application::prepare::{PrepareOutcome, prepare_all};
use crate::application::report::{ReportSummary, run_reports};
use crate::domain::project::{ALL_ENTITIES, PipelinePaths, ProjectConfig};
use crate::error::SmartSalesError;
use crate::infrastructure::adapters::{DuckDBAnalytics, SqliteWarehouse};
use crate::infrastructure::fs::write_json;

/// Everything one `run` produced, persisted as `run_results.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunResults {
    pub project: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub success: bool,
    pub prepare: Vec<PrepareOutcome>,
    pub load: LoadReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportSummary>,
}

/// prepare -> load -> report, each stage fully on disk before the next starts.
///
/// Reporting is skipped with a warning when the cube file has not been built yet.
pub fn run_pipeline(project_dir: &Path, config: &ProjectConfig) -> Result<RunResults, SmartSalesError> {
    let started_at = Utc::now();
    let timer = std::time::Instant::now();
    let paths = config.resolve_paths(project_dir);

    info!(project = config.name.as_str(), "Pipeline started");
    let prepare = prepare_all(&ALL_ENTITIES, &paths, &config.cleaning).into_result()?;

    let load = {
        let warehouse = SqliteWarehouse::open(&paths.warehouse)?;
        run_warehouse_load(&warehouse, &paths, config.load.on_row_error)?
    };

    let report = if paths.cube.exists() {
        let analytics = DuckDBAnalytics::in_memory()?;
        Some(run_reports(&analytics, &paths, &config.reporting)?)
    } else {
        warn!(path = %paths.cube.display(), "OLAP cube not found, reporting skipped");
        None
    };

    let success = !load.has_failures() && !report.as_ref().is_some_and(ReportSummary::has_failures);
    let results = RunResults {
        project: config.name.clone(),
        started_at,
        duration_ms: u64::try_from(timer.elapsed().as_millis()).unwrap_or(u64::MAX),
        success,
        prepare,
        load,
        report,
    };

    save_run_results(&paths, &results)?;
    info!(success, duration_ms = results.duration_ms, "Pipeline finished");
    Ok(results)
}

pub fn save_run_results(paths: &PipelinePaths, results: &RunResults) -> Result<(), SmartSalesError> {
    write_json(&paths.run_results(), results)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::project::Entity;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    fn write_raw(paths: &PipelinePaths) -> Result<()> {
        fs::create_dir_all(&paths.raw_dir)?;
        fs::write(
            paths.raw_file(Entity::Customers),
            "CustomerID,Name,Region,JoinDate,Purchases,AmountSpent\n\
             1001,Ann,East,2023-01-05,3,500\n\
             1001,Ann,East,2023-01-05,3,500\n\
             1002,,West,02/17/2023,1,9000\n\
             1003,Cy,North,2023-03-01,1,50\n",
        )?;
        fs::write(
            paths.raw_file(Entity::Products),
            "ProductID,ProductName,Category,UnitPrice,QuantityInStock,Supplier\n\
             101,Lamp,Home,10,5,Acme\n\
             102,Kite,Toys,12,3,Globex\n",
        )?;
        fs::write(
            paths.raw_file(Entity::Sales),
            "TransactionID,SaleDate,CustomerID,ProductID,StoreID,CampaignID,SaleAmount\n\
             550,2024-01-06,1001,101,404,0,10\n\
             551,2024-01-07,1002,102,403,0,24\n\
             552,2024-01-08,1003,101,404,0,10\n",
        )?;
        Ok(())
    }

    #[test]
    fn test_run_without_cube_prepares_and_loads() -> Result<()> {
        let dir = tempdir()?;
        let config: ProjectConfig = serde_yaml::from_str("name: test_project")?;
        let paths = config.resolve_paths(dir.path());
        write_raw(&paths)?;

        let results = run_pipeline(dir.path(), &config)?;

        assert_eq!(results.prepare.len(), 3);
        assert!(results.report.is_none());
        // Customer 1003 is an outlier, so its sale cannot reference it.
        assert!(!results.success);
        assert_eq!(results.load.rows_inserted(), 2 + 2 + 2);

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(paths.run_results())?)?;
        assert_eq!(json["project"], "test_project");
        assert_eq!(json["load"]["tables"]["sale"]["status"], "partial");
        assert_eq!(json["load"]["tables"]["customer"]["rows_inserted"], 2);
        Ok(())
    }
}
