// smartsales-core/src/domain/cleaning/missing.rs

use tracing::{debug, info};

use crate::domain::cleaning::StepOutcome;
use crate::domain::error::DomainError;
use crate::domain::stats;
use crate::domain::table::{Table, format_number};

#[derive(Debug, Clone, PartialEq)]
pub enum MissingPolicy {
    FillConstant(String),
    /// Median of the numeric values currently in the column.
    FillMedian,
    /// Most frequent value currently in the column.
    FillMode,
    DropRow,
}

impl MissingPolicy {
    fn is_fill(&self) -> bool {
        !matches!(self, MissingPolicy::DropRow)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissingRule {
    pub column: String,
    pub policy: MissingPolicy,
}

impl MissingRule {
    pub fn new(column: &str, policy: MissingPolicy) -> Self {
        Self {
            column: column.to_string(),
            policy,
        }
    }
}

/// Applies every fill rule, then every drop rule, in declaration order within each group.
///
/// All rule columns are checked up front: one missing column fails the step
/// before anything is computed.
pub fn handle_missing_values(
    table: &Table,
    entity: &str,
    rules: &[MissingRule],
) -> Result<StepOutcome, DomainError> {
    for rule in rules {
        table.require_column(entity, &rule.column)?;
    }
    info!(entity, nulls_before = table.null_count(), "Handling missing values");

    let mut current = table.clone();
    let mut cells_filled = 0;

    for rule in rules.iter().filter(|r| r.policy.is_fill()) {
        let idx = current.require_column(entity, &rule.column)?;
        let fill_value = match &rule.policy {
            MissingPolicy::FillConstant(value) => Some(value.clone()),
            MissingPolicy::FillMedian => stats::median(&current.numeric_values(idx)).map(format_number),
            MissingPolicy::FillMode => stats::mode(current.column_values(idx).flatten()),
            MissingPolicy::DropRow => None,
        };

        // An all-null column has no statistic to fill with; it stays null.
        if let Some(value) = fill_value {
            let (filled, count) = current.fill_nulls(idx, &value);
            debug!(entity, column = rule.column.as_str(), value = value.as_str(), count, "Filled nulls");
            current = filled;
            cells_filled += count;
        }
    }

    let mut rows_removed = 0;
    for rule in rules.iter().filter(|r| !r.policy.is_fill()) {
        let idx = current.require_column(entity, &rule.column)?;
        let kept = current.filter_rows(|row| row.get(idx).is_some_and(Option::is_some));
        rows_removed += current.len() - kept.len();
        current = kept;
    }

    info!(
        entity,
        cells_filled,
        rows_removed,
        rows = current.len(),
        "Missing values handled"
    );
    Ok(StepOutcome {
        table: current,
        rows_removed,
        cells_filled,
    })
}
