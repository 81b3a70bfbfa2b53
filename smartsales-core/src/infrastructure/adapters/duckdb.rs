// smartsales-core/src/infrastructure/adapters/duckdb.rs

use duckdb::{Config, Connection};
use tracing::debug;

use crate::domain::table::{Cell, Table};
use crate::domain::warehouse::schema::quote_ident;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::analytics::AnalyticsConnector;
use crate::ports::warehouse::ColumnSchema;

/// In-memory DuckDB used to scan the cube file.
pub struct DuckDBAnalytics {
    conn: Connection,
}

impl DuckDBAnalytics {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();
        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self, InfrastructureError> {
        Self::new(":memory:")
    }

    pub fn execute(&self, sql: &str) -> Result<(), InfrastructureError> {
        self.conn.execute_batch(sql).map_err(Into::into)
    }
}

impl AnalyticsConnector for DuckDBAnalytics {
    fn register_source(&self, name: &str, path: &str) -> Result<(), InfrastructureError> {
        let query = format!(
            "CREATE OR REPLACE VIEW {} AS SELECT * FROM read_csv_auto('{}')",
            quote_ident(name),
            path.replace('\'', "''")
        );
        self.execute(&query)
    }

    fn fetch_columns(&self, name: &str) -> Result<Vec<ColumnSchema>, InfrastructureError> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info('{}')", name.replace('\'', "''")))?;

        let rows = stmt.query_map([], |row| {
            Ok(ColumnSchema {
                name: row.get("name")?,
                data_type: row.get("type")?,
                is_nullable: !row.get::<_, bool>("notnull")?,
                is_primary_key: row.get::<_, bool>("pk")?,
            })
        })?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }
        Ok(columns)
    }

    fn query_table(&self, sql: &str, columns: &[&str]) -> Result<Table, InfrastructureError> {
        debug!(sql, "DuckDB query");
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;

        let mut table = Table::new(columns.iter().map(|c| c.to_string()).collect());
        while let Some(row) = rows.next()? {
            let mut cells: Vec<Cell> = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                cells.push(row.get::<_, Option<String>>(i)?);
            }
            table.push_row(cells)?;
        }
        Ok(table)
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::reporting::{CubeColumns, ReportGoal};
    use anyhow::Result;
    use std::fs;

    const CUBE: &str = "\
DayOfWeek,Month,Region,Supplier,customer_id,sale_amount_sum,transaction_id_count
Monday,January,East,Acme,1001,100.0,1
Tuesday,January,East,Acme,1001,300.5,2
Monday,February,East,Acme,1002,250.0,1
Friday,February,West,Globex,1002,80.0,3
";

    fn analytics_with_cube() -> Result<(tempfile::TempDir, DuckDBAnalytics)> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cube.csv");
        fs::write(&path, CUBE)?;
        let analytics = DuckDBAnalytics::in_memory()?;
        analytics.register_source("cube", &path.to_string_lossy())?;
        Ok((dir, analytics))
    }

    fn run(analytics: &DuckDBAnalytics, goal: ReportGoal) -> Result<Table> {
        let sql = goal.sql(&CubeColumns::default(), "cube");
        Ok(analytics.query_table(&sql, goal.output_columns())?)
    }

    #[test]
    fn test_register_source_exposes_columns() -> Result<()> {
        let (_dir, analytics) = analytics_with_cube()?;
        let columns = analytics.fetch_columns("cube")?;
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["DayOfWeek", "Month", "Region", "Supplier", "customer_id", "sale_amount_sum", "transaction_id_count"]
        );
        Ok(())
    }

    #[test]
    fn test_peak_sell_times_picks_best_day_per_region_supplier() -> Result<()> {
        let (_dir, analytics) = analytics_with_cube()?;
        let table = run(&analytics, ReportGoal::PeakSellTimes)?;
        assert_eq!(table.len(), 2);
        // Monday (350) beats Tuesday (300.5) for East/Acme.
        assert_eq!(table.cell(0, 0), Some("Monday"));
        assert_eq!(table.cell(0, 1), Some("East"));
        assert_eq!(table.cell(1, 0), Some("Friday"));
        Ok(())
    }

    #[test]
    fn test_weekday_revenue_lowest_first() -> Result<()> {
        let (_dir, analytics) = analytics_with_cube()?;
        let table = run(&analytics, ReportGoal::WeekdayRevenue)?;
        let days: Vec<_> = table.column_values(0).flatten().collect();
        assert_eq!(days, vec!["Friday", "Tuesday", "Monday"]);
        Ok(())
    }

    #[test]
    fn test_purchase_frequency_averages_per_month() -> Result<()> {
        let (_dir, analytics) = analytics_with_cube()?;
        let table = run(&analytics, ReportGoal::PurchaseFrequency)?;
        assert_eq!(table.len(), 2);
        // February/1002 averages 2 transactions, January/1001 averages 1.5.
        assert_eq!(table.cell(0, 0), Some("February"));
        assert_eq!(table.cell(0, 1), Some("1002"));
        assert_eq!(table.cell(0, 2).and_then(|v| v.parse::<f64>().ok()), Some(2.0));
        assert_eq!(table.cell(0, 3).and_then(|v| v.parse::<f64>().ok()), Some(330.0));
        assert_eq!(table.cell(1, 0), Some("January"));
        assert_eq!(table.cell(1, 2).and_then(|v| v.parse::<f64>().ok()), Some(1.5));
        assert_eq!(table.cell(1, 3).and_then(|v| v.parse::<f64>().ok()), Some(400.5));
        Ok(())
    }

    #[test]
    fn test_invalid_sql_is_database_error() -> Result<()> {
        let analytics = DuckDBAnalytics::in_memory()?;
        let result = analytics.query_table("SELECT * FROM non_existent_table", &["x"]);
        assert!(matches!(result, Err(InfrastructureError::Database(_))));
        Ok(())
    }
}
