// smartsales-core/src/infrastructure/adapters/sqlite.rs

use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, params_from_iter};
use std::path::Path;
use tracing::{debug, info};

use crate::domain::table::{Cell, Table, format_number};
use crate::domain::warehouse::SqlValue;
use crate::domain::warehouse::schema::quote_ident;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::warehouse::{ColumnSchema, WarehouseConnector};

/// Single-file SQLite warehouse. The connection closes, rolling back any open
/// transaction, when this value is dropped.
pub struct SqliteWarehouse {
    conn: Connection,
}

impl SqliteWarehouse {
    /// Opens (or creates) the warehouse file, creating its parent directory.
    pub fn open(path: &Path) -> Result<Self, InfrastructureError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        info!(path = %path.display(), "Opening SQLite warehouse");
        Self::configure(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, InfrastructureError> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> Result<Self, InfrastructureError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }
}

impl WarehouseConnector for SqliteWarehouse {
    fn execute_batch(&self, sql: &str) -> Result<(), InfrastructureError> {
        debug!(sql, "SQLite batch");
        self.conn.execute_batch(sql).map_err(Into::into)
    }

    fn insert_row(&self, table: &str, columns: &[&str], values: &[SqlValue]) -> Result<(), InfrastructureError> {
        let names: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
        let params: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table),
            names.join(", "),
            params.join(", ")
        );

        // Same statement text for every row of a table, so the cache hits after the first.
        let mut stmt = self.conn.prepare_cached(&sql)?;
        stmt.execute(params_from_iter(values.iter().map(to_sqlite)))?;
        Ok(())
    }

    fn count_rows(&self, table: &str) -> Result<u64, InfrastructureError> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    fn fetch_columns(&self, table: &str) -> Result<Vec<ColumnSchema>, InfrastructureError> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;

        let rows = stmt.query_map([], |row| {
            Ok(ColumnSchema {
                name: row.get("name")?,
                data_type: row.get("type")?,
                is_nullable: row.get::<_, i64>("notnull")? == 0,
                is_primary_key: row.get::<_, i64>("pk")? > 0,
            })
        })?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }
        Ok(columns)
    }

    fn sample_rows(&self, table: &str, limit: usize) -> Result<Table, InfrastructureError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {} LIMIT ?1", quote_ident(table)))?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = columns.len();

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut rows = stmt.query([limit])?;
        let mut out: Vec<Vec<Cell>> = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                cells.push(render(row.get_ref(i)?));
            }
            out.push(cells);
        }

        Ok(Table::from_rows(columns, out)?)
    }

    fn engine_name(&self) -> &str {
        "sqlite"
    }
}

fn to_sqlite(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(v) => Value::Integer(*v),
        SqlValue::Real(v) => Value::Real(*v),
        SqlValue::Text(v) => Value::Text(v.clone()),
    }
}

fn render(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(v) => Some(v.to_string()),
        ValueRef::Real(v) => Some(format_number(v)),
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Some(format!("<{} bytes>", bytes.len())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_sqlite_flow() -> Result<()> {
        let warehouse = SqliteWarehouse::in_memory()?;
        warehouse.execute_batch("CREATE TABLE users (id TEXT PRIMARY KEY, score REAL NOT NULL)")?;

        let columns = warehouse.fetch_columns("users")?;
        assert_eq!(columns.len(), 2);
        let id = columns
            .iter()
            .find(|c| c.name == "id")
            .ok_or_else(|| anyhow::anyhow!("Column 'id' not found"))?;
        assert!(id.is_primary_key);
        let score = columns
            .iter()
            .find(|c| c.name == "score")
            .ok_or_else(|| anyhow::anyhow!("Column 'score' not found"))?;
        assert_eq!(score.data_type, "REAL");
        assert!(!score.is_nullable);

        warehouse.insert_row("users", &["id", "score"], &[SqlValue::Text("a".into()), SqlValue::Real(1.5)])?;
        warehouse.insert_row("users", &["id", "score"], &[SqlValue::Text("b".into()), SqlValue::Real(2.0)])?;
        assert_eq!(warehouse.count_rows("users")?, 2);

        let sample = warehouse.sample_rows("users", 1)?;
        assert_eq!(sample.columns(), ["id", "score"]);
        assert_eq!(sample.len(), 1);
        assert_eq!(sample.cell(0, 1), Some("1.5"));
        Ok(())
    }

    #[test]
    fn test_sqlite_constraint_error() -> Result<()> {
        let warehouse = SqliteWarehouse::in_memory()?;
        warehouse.execute_batch("CREATE TABLE users (id TEXT PRIMARY KEY)")?;
        warehouse.insert_row("users", &["id"], &[SqlValue::Text("a".into())])?;
        let duplicate = warehouse.insert_row("users", &["id"], &[SqlValue::Text("a".into())]);
        assert!(matches!(duplicate, Err(InfrastructureError::Database(_))));
        Ok(())
    }

    #[test]
    fn test_missing_table_has_no_columns() -> Result<()> {
        let warehouse = SqliteWarehouse::in_memory()?;
        assert!(warehouse.fetch_columns("nope")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_open_creates_parent_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("dw").join("smart_sales.db");
        drop(SqliteWarehouse::open(&path)?);
        assert!(path.exists());
        Ok(())
    }
}
