// smartsales-core/src/domain/cleaning/duplicates.rs

use std::collections::HashSet;

use tracing::{error, info};

use crate::domain::cleaning::StepOutcome;
use crate::domain::error::DomainError;
use crate::domain::table::{Cell, Table};

/// Which cells make two rows "the same record".
#[derive(Debug, Clone, PartialEq)]
pub enum DedupKey {
    /// Rows identical across every column.
    AllColumns,
    /// Rows sharing this key column. Identical full rows are collapsed afterwards too.
    Column(String),
}

/// What to do when a `DedupKey::Column` is not present in the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingKeyBehavior {
    /// Return the input unchanged and log the problem.
    #[default]
    Skip,
    Fail,
}

/// Keeps the first occurrence of every key, preserving the original order.
pub fn remove_duplicates(
    table: &Table,
    entity: &str,
    key: &DedupKey,
    missing_key: MissingKeyBehavior,
) -> Result<StepOutcome, DomainError> {
    info!(entity, shape = ?table.shape(), "Removing duplicate rows");

    let deduped = match key {
        DedupKey::AllColumns => keep_first(table, |row| row.to_vec()),
        DedupKey::Column(column) => {
            let Some(idx) = table.column_index(column) else {
                return match missing_key {
                    MissingKeyBehavior::Skip => {
                        error!(
                            entity,
                            column = column.as_str(),
                            "Key column not found, duplicates left in place"
                        );
                        Ok(StepOutcome::unchanged(table))
                    }
                    MissingKeyBehavior::Fail => Err(DomainError::missing_column(entity, column)),
                };
            };
            let by_key = keep_first(table, |row| vec![row.get(idx).cloned().flatten()]);
            keep_first(&by_key, |row| row.to_vec())
        }
    };

    let removed = table.len() - deduped.len();
    info!(entity, removed, shape = ?deduped.shape(), "Duplicates removed");
    Ok(StepOutcome::removed(deduped, removed))
}

/// Number of rows that repeat an earlier row across all columns.
pub fn count_duplicate_rows(table: &Table) -> usize {
    table.len() - keep_first(table, |row| row.to_vec()).len()
}

// Null keys compare equal to each other, so two rows with a missing key
// collapse like any other duplicate.
fn keep_first<F>(table: &Table, key_of: F) -> Table
where
    F: Fn(&[Cell]) -> Vec<Cell>,
{
    let mut seen: HashSet<Vec<Cell>> = HashSet::with_capacity(table.len());
    table.filter_rows(|row| seen.insert(key_of(row)))
}
