// smartsales-core/src/infrastructure/error.rs

use crate::domain::error::DomainError;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("SQLite Warehouse Error: {0}")]
    #[diagnostic(
        code(smartsales::infra::database::sqlite),
        help("An error occurred inside the warehouse engine.")
    )]
    Sqlite(#[from] rusqlite::Error),

    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(smartsales::infra::database::duckdb),
        help("An error occurred inside the analytics engine.")
    )]
    DuckDB(#[from] duckdb::Error),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    /// A savepoint statement failed, so the table's rows can no longer be
    /// kept or discarded on their own.
    #[error("Savepoint {stage} failed for table '{table}': {source}")]
    #[diagnostic(
        code(smartsales::infra::transaction),
        help("The whole warehouse load is rolled back; the previous contents are kept.")
    )]
    Transaction {
        table: String,
        stage: &'static str,
        #[source]
        source: Box<InfrastructureError>,
    },

    // --- FILESYSTEM (IO) ---
    #[error("File not found: {}", .path.display())]
    #[diagnostic(
        code(smartsales::infra::not_found),
        help("Check the raw/prepared directories in smartsales.yaml.")
    )]
    NotFound { path: PathBuf },

    #[error("File System Error: {0}")]
    #[diagnostic(
        code(smartsales::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Data(#[from] DomainError),

    // --- CSV ---
    #[error("Parse Error in {} (line {line}): {message}", .path.display())]
    #[diagnostic(
        code(smartsales::infra::parse),
        help("Every record must have as many fields as the header row.")
    )]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(smartsales::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Serialization Error: {0}")]
    #[diagnostic(code(smartsales::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(smartsales::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(smartsales::infra::config_missing))]
    ConfigNotFound(String),
}

impl From<rusqlite::Error> for InfrastructureError {
    fn from(err: rusqlite::Error) -> Self {
        InfrastructureError::Database(DatabaseError::Sqlite(err))
    }
}

impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}

/// Why a single row could not be inserted into the warehouse.
#[derive(Error, Debug)]
pub enum LoadErrorCause {
    #[error(transparent)]
    Database(#[from] InfrastructureError),

    #[error(transparent)]
    Conversion(#[from] DomainError),
}

/// A row rejected by the warehouse. Isolated to its table, never fatal for the run.
#[derive(Error, Debug, Diagnostic)]
#[error("Load Error: row {row} of '{table}' rejected: {cause}")]
#[diagnostic(code(smartsales::infra::load))]
pub struct LoadError {
    pub table: String,
    pub row: usize,
    #[source]
    pub cause: LoadErrorCause,
}
