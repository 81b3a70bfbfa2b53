// smartsales-core/src/application/load.rs

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, info, instrument, warn};

use crate::domain::error::DomainError;
use crate::domain::project::{Entity, PipelinePaths, RowErrorPolicy};
use crate::domain::table::Table;
use crate::domain::warehouse::{LOAD_ORDER, RESET_ORDER, WarehouseTable, map_columns};
use crate::error::SmartSalesError;
use crate::infrastructure::csv::load_table;
use crate::infrastructure::error::{InfrastructureError, LoadError, LoadErrorCause};
use crate::ports::warehouse::WarehouseConnector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Loaded,
    Partial,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    /// 1-based data row in the prepared file.
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableLoadReport {
    pub status: TableStatus,
    pub rows_read: usize,
    pub rows_inserted: usize,
    pub failures: Vec<RowFailure>,
    pub ignored_columns: Vec<String>,
    /// Table-level error (schema problem, aborted load).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TableLoadReport {
    fn failed(rows_read: usize, error: String) -> Self {
        Self {
            status: TableStatus::Failed,
            rows_read,
            rows_inserted: 0,
            failures: Vec::new(),
            ignored_columns: Vec::new(),
            error: Some(error),
        }
    }
}

/// Outcome of one warehouse reload, per table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub tables: BTreeMap<WarehouseTable, TableLoadReport>,
}

impl LoadReport {
    pub fn has_failures(&self) -> bool {
        self.tables.values().any(|t| t.status != TableStatus::Loaded)
    }

    pub fn rows_inserted(&self) -> usize {
        self.tables.values().map(|t| t.rows_inserted).sum()
    }
}

/// Creates the three tables if needed, then checks that every declared column
/// exists in the live schema.
#[instrument(skip(conn))]
pub fn ensure_schema(conn: &dyn WarehouseConnector) -> Result<(), SmartSalesError> {
    for table in LOAD_ORDER {
        conn.execute_batch(&table.create_sql())?;
    }

    for table in LOAD_ORDER {
        let live = conn.fetch_columns(table.name())?;
        for def in table.columns() {
            if !live.iter().any(|c| c.name.eq_ignore_ascii_case(def.name)) {
                error!(table = table.name(), column = def.name, "Warehouse table is missing a declared column");
                return Err(DomainError::missing_column(table.name(), def.name).into());
            }
        }
    }
    info!("Warehouse schema ready");
    Ok(())
}

/// Deletes every row, facts first.
pub fn reset(conn: &dyn WarehouseConnector) -> Result<(), SmartSalesError> {
    for table in RESET_ORDER {
        conn.execute_batch(&table.delete_sql())?;
    }
    info!("Existing warehouse records deleted");
    Ok(())
}

/// Inserts a prepared batch into `table`, one row at a time.
///
/// A missing key column fails the whole table. Individual row failures are
/// recorded and, depending on `policy`, either skipped or rolled back together
/// with every row of the table inserted so far.
#[instrument(skip(conn, prepared))]
pub fn load(
    conn: &dyn WarehouseConnector,
    table: WarehouseTable,
    prepared: &Table,
    policy: RowErrorPolicy,
) -> Result<TableLoadReport, SmartSalesError> {
    let mapping = map_columns(table, prepared)?;
    let columns = mapping.column_names();
    let savepoint = format!("load_{}", table.name());

    savepoint_step(conn, table, "SAVEPOINT", &format!("SAVEPOINT {}", savepoint))?;

    let mut inserted = 0;
    let mut failures = Vec::new();
    let mut aborted = false;

    for (idx, row) in prepared.rows().iter().enumerate() {
        let result = mapping
            .convert_row(row)
            .map_err(LoadErrorCause::from)
            .and_then(|values| {
                conn.insert_row(table.name(), &columns, &values)
                    .map_err(LoadErrorCause::from)
            });

        if let Err(cause) = result {
            let err = LoadError {
                table: table.name().to_string(),
                row: idx + 1,
                cause,
            };
            error!("{}", err);
            failures.push(RowFailure {
                row: err.row,
                message: err.cause.to_string(),
            });
            if policy == RowErrorPolicy::AbortTable {
                aborted = true;
                break;
            }
            continue;
        }
        inserted += 1;
    }

    // A failed ROLLBACK TO leaves the savepoint open; the caller's outer
    // ROLLBACK closes it together with the transaction.
    if aborted {
        savepoint_step(conn, table, "ROLLBACK TO", &format!("ROLLBACK TO {}", savepoint))?;
        warn!(rows_discarded = inserted, "Table load aborted and rolled back");
        inserted = 0;
    }
    savepoint_step(conn, table, "RELEASE", &format!("RELEASE {}", savepoint))?;

    let status = match (aborted, failures.is_empty()) {
        (true, _) => TableStatus::Failed,
        (false, true) => TableStatus::Loaded,
        (false, false) => TableStatus::Partial,
    };
    info!(rows_read = prepared.len(), rows_inserted = inserted, ?status, "Table loaded");

    Ok(TableLoadReport {
        status,
        rows_read: prepared.len(),
        rows_inserted: inserted,
        failures,
        ignored_columns: mapping.ignored,
        error: aborted.then(|| "load aborted on first failed row".to_string()),
    })
}

fn savepoint_step(
    conn: &dyn WarehouseConnector,
    table: WarehouseTable,
    stage: &'static str,
    sql: &str,
) -> Result<(), InfrastructureError> {
    conn.execute_batch(sql).map_err(|e| InfrastructureError::Transaction {
        table: table.name().to_string(),
        stage,
        source: Box::new(e),
    })
}

/// Full reload: `BEGIN` -> `ensure_schema` -> `reset` -> load every table -> `COMMIT`.
///
/// A failing table is recorded in the report and never blocks the commit of
/// the others. Schema, reset and savepoint errors roll the whole transaction back.
pub fn run_warehouse_load(
    conn: &dyn WarehouseConnector,
    paths: &PipelinePaths,
    policy: RowErrorPolicy,
) -> Result<LoadReport, SmartSalesError> {
    let mut batches = Vec::with_capacity(LOAD_ORDER.len());
    for table in LOAD_ORDER {
        let path = paths.prepared_file(Entity::for_table(table));
        info!(table = table.name(), path = %path.display(), "Reading prepared data");
        batches.push((table, load_table(&path)?));
    }

    conn.execute_batch("BEGIN")?;
    match load_batches(conn, &batches, policy) {
        Ok(report) => {
            conn.execute_batch("COMMIT")?;
            info!(rows_inserted = report.rows_inserted(), "Warehouse load committed");
            Ok(report)
        }
        Err(e) => {
            if let Err(rollback) = conn.execute_batch("ROLLBACK") {
                warn!(error = %rollback, "Rollback failed");
            }
            Err(e)
        }
    }
}

fn load_batches(
    conn: &dyn WarehouseConnector,
    batches: &[(WarehouseTable, Table)],
    policy: RowErrorPolicy,
) -> Result<LoadReport, SmartSalesError> {
    ensure_schema(conn)?;
    reset(conn)?;

    let mut report = LoadReport::default();
    for (table, prepared) in batches {
        let outcome = match load(conn, *table, prepared, policy) {
            Ok(outcome) => outcome,
            Err(e @ SmartSalesError::Infrastructure(InfrastructureError::Transaction { .. })) => return Err(e),
            Err(e) => {
                error!(table = table.name(), error = %e, "Table load failed");
                TableLoadReport::failed(prepared.len(), e.to_string())
            }
        };
        report.tables.insert(*table, outcome);
    }
    Ok(report)
}
