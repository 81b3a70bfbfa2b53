// smartsales-core/src/domain/cleaning/mod.rs

pub mod columns;
pub mod duplicates;
pub mod entities;
pub mod missing;
pub mod outliers;
pub mod validation;

use serde::Serialize;
use tracing::info;

use crate::domain::error::DomainError;
use crate::domain::table::Table;

pub use columns::{normalize_column_name, normalize_columns};
pub use duplicates::{DedupKey, MissingKeyBehavior, remove_duplicates};
pub use entities::{CustomerRules, ProductRules, SaleRules, clean_customers, clean_products, clean_sales};
pub use missing::{MissingPolicy, MissingRule, handle_missing_values};
pub use outliers::{OutlierRule, remove_outliers};
pub use validation::{ValidationSummary, validate_table};

/// What a single cleaning step produced. The step's input is never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub table: Table,
    pub rows_removed: usize,
    pub cells_filled: usize,
}

impl StepOutcome {
    pub fn unchanged(table: &Table) -> Self {
        Self {
            table: table.clone(),
            rows_removed: 0,
            cells_filled: 0,
        }
    }

    pub fn removed(table: Table, rows_removed: usize) -> Self {
        Self {
            table,
            rows_removed,
            cells_filled: 0,
        }
    }
}

/// Declared rule set for one entity, applied in a fixed order:
/// normalize -> dedup -> missing values -> outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRules {
    pub entity: String,
    pub dedup_key: DedupKey,
    pub missing_key: MissingKeyBehavior,
    pub missing: Vec<MissingRule>,
    pub outliers: Vec<OutlierRule>,
}

/// Counters for one entity run, serialized into the run results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningReport {
    pub entity: String,
    pub rows_in: usize,
    pub renamed_columns: Vec<(String, String)>,
    pub duplicates_removed: usize,
    pub cells_filled: usize,
    pub rows_dropped_missing: usize,
    pub outliers_removed: usize,
    pub rows_out: usize,
    pub validation: ValidationSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cleaned {
    pub table: Table,
    pub report: CleaningReport,
}

/// Runs every step of `rules` over `table`.
pub fn apply_rules(table: &Table, rules: &EntityRules) -> Result<Cleaned, DomainError> {
    let entity = rules.entity.as_str();
    info!(entity, shape = ?table.shape(), "Cleaning started");

    let normalized = normalize_columns(table, entity)?;
    if !normalized.renamed.is_empty() {
        let changed: Vec<String> = normalized
            .renamed
            .iter()
            .map(|(old, new)| format!("{} -> {}", old, new))
            .collect();
        info!(entity, "Cleaned column names: {}", changed.join(", "));
    }

    let deduped = remove_duplicates(&normalized.table, entity, &rules.dedup_key, rules.missing_key)?;
    let filled = handle_missing_values(&deduped.table, entity, &rules.missing)?;
    let trimmed = remove_outliers(&filled.table, entity, &rules.outliers)?;
    let validation = validate_table(&trimmed.table, entity);

    let report = CleaningReport {
        entity: entity.to_string(),
        rows_in: table.len(),
        renamed_columns: normalized.renamed,
        duplicates_removed: deduped.rows_removed,
        cells_filled: filled.cells_filled,
        rows_dropped_missing: filled.rows_removed,
        outliers_removed: trimmed.rows_removed,
        rows_out: trimmed.table.len(),
        validation,
    };
    info!(entity, rows_in = report.rows_in, rows_out = report.rows_out, "Cleaning finished");

    Ok(Cleaned {
        table: trimmed.table,
        report,
    })
}
