// smartsales-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum SmartSalesError {
    // --- DOMAIN ERRORS (schema, rules) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, parsing, database) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- BATCH ERRORS ---
    #[error("Data preparation failed for {count} datasets: {details}")]
    #[diagnostic(
        code(smartsales::prepare_failed),
        help("Every dataset was attempted; each failure is listed with its entity.")
    )]
    PrepareFailed { count: usize, details: String },

    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl From<std::io::Error> for SmartSalesError {
    fn from(err: std::io::Error) -> Self {
        SmartSalesError::Infrastructure(InfrastructureError::Io(err))
    }
}
