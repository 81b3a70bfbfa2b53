pub mod mapping;
pub mod schema;

pub use mapping::{ColumnMapping, SqlValue, map_columns};
pub use schema::{ColumnDef, LOAD_ORDER, RESET_ORDER, SqlType, WarehouseTable};
