// smartsales-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, PartialEq)]
pub enum DomainError {
    #[error("Schema Error: column '{column}' not found in {entity} data")]
    #[diagnostic(
        code(smartsales::domain::schema),
        help("Column names are normalized to snake_case before rules run (e.g. 'CustomerID' -> 'customer_id').")
    )]
    SchemaError { entity: String, column: String },

    #[error("Row {row} has {actual} fields, expected {expected}")]
    #[diagnostic(code(smartsales::domain::row_width))]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Column '{column}' expects {expected}, got '{value}'")]
    #[diagnostic(code(smartsales::domain::value))]
    InvalidValue {
        column: String,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid cleaning rule: {0}")]
    #[diagnostic(code(smartsales::domain::rule))]
    InvalidRule(String),
}

impl DomainError {
    pub fn missing_column(entity: &str, column: &str) -> Self {
        DomainError::SchemaError {
            entity: entity.to_string(),
            column: column.to_string(),
        }
    }
}
