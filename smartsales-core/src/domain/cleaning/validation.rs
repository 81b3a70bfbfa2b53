// smartsales-core/src/domain/cleaning/validation.rs

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::cleaning::duplicates::count_duplicate_rows;
use crate::domain::table::Table;

/// Post-clean health check. Findings are warnings, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct ValidationSummary {
    pub remaining_nulls: usize,
    pub remaining_duplicates: usize,
}

impl ValidationSummary {
    pub fn is_clean(&self) -> bool {
        self.remaining_nulls == 0 && self.remaining_duplicates == 0
    }
}

pub fn validate_table(table: &Table, entity: &str) -> ValidationSummary {
    let summary = ValidationSummary {
        remaining_nulls: table.null_count(),
        remaining_duplicates: count_duplicate_rows(table),
    };

    if summary.remaining_nulls > 0 {
        warn!(entity, nulls = summary.remaining_nulls, "Missing values found after cleaning");
    }
    if summary.remaining_duplicates > 0 {
        warn!(
            entity,
            duplicates = summary.remaining_duplicates,
            "Duplicate rows found after cleaning"
        );
    }
    info!(entity, shape = ?table.shape(), "Data validation completed");
    summary
}
