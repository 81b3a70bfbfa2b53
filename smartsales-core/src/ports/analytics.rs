// smartsales-core/src/ports/analytics.rs

use crate::domain::table::Table;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::warehouse::ColumnSchema;

/// Read-only query engine over the cube file.
pub trait AnalyticsConnector {
    /// Exposes the CSV at `path` as the view `name` (e.g. through `read_csv_auto`).
    fn register_source(&self, name: &str, path: &str) -> Result<(), InfrastructureError>;

    fn fetch_columns(&self, name: &str) -> Result<Vec<ColumnSchema>, InfrastructureError>;

    /// Runs `sql`, whose result columns must all be text, into a `Table` named by `columns`.
    fn query_table(&self, sql: &str, columns: &[&str]) -> Result<Table, InfrastructureError>;

    fn engine_name(&self) -> &str;
}
