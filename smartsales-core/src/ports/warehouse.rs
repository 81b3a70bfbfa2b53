// smartsales-core/src/ports/warehouse.rs

// What the loader needs from a relational warehouse, without knowing which engine backs it.

use crate::domain::table::Table;
use crate::domain::warehouse::SqlValue;
use crate::infrastructure::error::InfrastructureError;

// Engine-independent description of a live column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub is_primary_key: bool,
}

pub trait WarehouseConnector {
    fn execute_batch(&self, sql: &str) -> Result<(), InfrastructureError>;

    /// Inserts one row. `values` are bound positionally to `columns`.
    fn insert_row(&self, table: &str, columns: &[&str], values: &[SqlValue]) -> Result<(), InfrastructureError>;

    fn count_rows(&self, table: &str) -> Result<u64, InfrastructureError>;

    /// Empty when the table does not exist.
    fn fetch_columns(&self, table: &str) -> Result<Vec<ColumnSchema>, InfrastructureError>;

    /// First `limit` rows, rendered as text.
    fn sample_rows(&self, table: &str, limit: usize) -> Result<Table, InfrastructureError>;

    fn engine_name(&self) -> &str;
}
