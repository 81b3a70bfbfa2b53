// smartsales-core/src/domain/table.rs

use crate::domain::error::DomainError;

/// A single field. `None` is a missing value.
pub type Cell = Option<String>;

/// In-memory, fully materialized tabular batch.
///
/// Column order and row order are preserved through every operation so that
/// "keep first occurrence" policies and file round trips are deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table, rejecting rows whose width differs from the header.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, DomainError> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), DomainError> {
        if row.len() != self.columns.len() {
            return Err(DomainError::RowWidth {
                row: self.rows.len() + 1,
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(rows, columns)`, printed in logs the way dataframe shapes usually are.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of a column the caller cannot work without.
    pub fn require_column(&self, entity: &str, name: &str) -> Result<usize, DomainError> {
        self.column_index(name)
            .ok_or_else(|| DomainError::missing_column(entity, name))
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }

    pub fn column_values(&self, column: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(column).and_then(|c| c.as_deref()))
    }

    /// Numeric values of a column, skipping nulls and unparseable cells.
    pub fn numeric_values(&self, column: usize) -> Vec<f64> {
        self.column_values(column).filter_map(parse_number).collect()
    }

    pub fn null_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|c| c.is_none()).count())
            .sum()
    }

    /// Same rows under new column names.
    pub fn with_columns(&self, columns: Vec<String>) -> Result<Self, DomainError> {
        if columns.len() != self.columns.len() {
            return Err(DomainError::RowWidth {
                row: 0,
                expected: self.columns.len(),
                actual: columns.len(),
            });
        }
        Ok(Self {
            columns,
            rows: self.rows.clone(),
        })
    }

    /// New table holding the rows for which `keep` returns true, in order.
    pub fn filter_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&[Cell]) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row))
                .cloned()
                .collect(),
        }
    }

    /// New table where nulls of `column` are replaced by `value`.
    /// Returns the table and how many cells were filled.
    pub fn fill_nulls(&self, column: usize, value: &str) -> (Self, usize) {
        let mut filled = 0;
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                if let Some(cell) = row.get_mut(column)
                    && cell.is_none()
                {
                    *cell = Some(value.to_string());
                    filled += 1;
                }
                row
            })
            .collect();
        (
            Self {
                columns: self.columns.clone(),
                rows,
            },
            filled,
        )
    }
}

/// Parses a cell as a finite number. Thousands separators are not accepted.
pub fn parse_number(value: Option<&str>) -> Option<f64> {
    let parsed: f64 = value?.trim().parse().ok()?;
    parsed.is_finite().then_some(parsed)
}

/// Renders a statistic back into a cell (`12` rather than `12.0`).
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}
