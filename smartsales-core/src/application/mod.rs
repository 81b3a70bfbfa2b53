// smartsales-core/src/application/mod.rs

pub mod load;
pub mod pipeline;
pub mod prepare;
pub mod report;

// --- RE-EXPORTS ---
// The CLI only needs `use smartsales_core::application::{...}`.

pub use load::{LoadReport, TableLoadReport, TableStatus, ensure_schema, load, reset, run_warehouse_load};
pub use pipeline::{RunResults, run_pipeline, save_run_results};
pub use prepare::{PrepareBatch, PrepareOutcome, clean_entity, prepare_all, prepare_entity};
pub use report::{ReportSummary, lowest_revenue_day, register_cube, run_goal, run_reports};
