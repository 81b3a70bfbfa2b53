// smartsales-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts for the relational warehouse and the cube analytics engine.
pub mod ports;

// 2. Domain
// Tables, cleaning rules, warehouse schema, reporting goals, configuration.
// Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure (Adapters)
// CSV files, SQLite warehouse, DuckDB analytics, YAML config.
pub mod infrastructure;

// 4. Application (Use Cases)
// Prepare, Load, Report, Pipeline.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use domain::table::Table;
pub use error::SmartSalesError;
