pub mod duckdb;
pub mod sqlite;

pub use self::duckdb::DuckDBAnalytics;
pub use self::sqlite::SqliteWarehouse;
