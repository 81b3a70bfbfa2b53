// smartsales-core/src/domain/cleaning/outliers.rs

use tracing::info;

use crate::domain::cleaning::StepOutcome;
use crate::domain::error::DomainError;
use crate::domain::stats;
use crate::domain::table::{Table, parse_number};

#[derive(Debug, Clone, PartialEq)]
pub enum OutlierRule {
    /// Literal bounds.
    Range {
        column: String,
        lower: f64,
        upper: f64,
        inclusive: bool,
    },
    /// Inclusive `[Q1 - k*IQR, Q3 + k*IQR]`, quartiles taken over the current batch.
    Iqr { column: String, multiplier: f64 },
}

impl OutlierRule {
    pub fn column(&self) -> &str {
        match self {
            OutlierRule::Range { column, .. } | OutlierRule::Iqr { column, .. } => column,
        }
    }
}

/// The bounds a rule resolved to for one batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
    pub inclusive: bool,
}

impl Bounds {
    pub fn contains(&self, value: f64) -> bool {
        if self.inclusive {
            value >= self.lower && value <= self.upper
        } else {
            value > self.lower && value < self.upper
        }
    }
}

/// Resolves the bounds of `rule` against `table`.
/// `None` when a statistical rule has no numeric value to work from.
pub fn resolve_bounds(table: &Table, idx: usize, rule: &OutlierRule) -> Option<Bounds> {
    match rule {
        OutlierRule::Range {
            lower,
            upper,
            inclusive,
            ..
        } => Some(Bounds {
            lower: *lower,
            upper: *upper,
            inclusive: *inclusive,
        }),
        OutlierRule::Iqr { multiplier, .. } => {
            let (lower, upper) = stats::iqr_bounds(&table.numeric_values(idx), *multiplier)?;
            Some(Bounds {
                lower,
                upper,
                inclusive: true,
            })
        }
    }
}

/// Drops every row whose value is outside the rule bounds.
///
/// Null or non-numeric values never satisfy a bound and are dropped as well,
/// so afterwards every remaining value of the column is a number within range.
pub fn remove_outliers(
    table: &Table,
    entity: &str,
    rules: &[OutlierRule],
) -> Result<StepOutcome, DomainError> {
    for rule in rules {
        table.require_column(entity, rule.column())?;
    }
    info!(entity, shape = ?table.shape(), "Removing outliers");

    let mut current = table.clone();
    for rule in rules {
        let idx = current.require_column(entity, rule.column())?;
        let bounds = resolve_bounds(&current, idx, rule);
        info!(entity, column = rule.column(), ?bounds, "Outlier bounds");

        current = current.filter_rows(|row| {
            let value = parse_number(row.get(idx).and_then(|c| c.as_deref()));
            match (bounds, value) {
                (Some(b), Some(v)) => b.contains(v),
                _ => false,
            }
        });
    }

    let removed = table.len() - current.len();
    info!(entity, removed, shape = ?current.shape(), "Removed outlier rows");
    Ok(StepOutcome::removed(current, removed))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn single_column(name: &str, values: &[Option<&str>]) -> Table {
        Table::from_rows(
            vec![name.to_string()],
            values.iter().map(|v| vec![v.map(str::to_string)]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_exclusive_range_drops_boundaries() {
        let input = single_column(
            "amount_spent",
            &[Some("200"), Some("200.01"), Some("5000"), Some("10000"), Some("50")],
        );
        let rule = OutlierRule::Range {
            column: "amount_spent".into(),
            lower: 200.0,
            upper: 10000.0,
            inclusive: false,
        };
        let out = remove_outliers(&input, "customer", &[rule]).unwrap();
        assert_eq!(out.rows_removed, 3);
        let kept: Vec<_> = out.table.column_values(0).flatten().collect();
        assert_eq!(kept, vec!["200.01", "5000"]);
    }

    #[test]
    fn test_iqr_removes_extreme_price() {
        let input = single_column(
            "unit_price",
            &[Some("10"), Some("12"), Some("11"), Some("13"), Some("1000")],
        );
        let rule = OutlierRule::Iqr {
            column: "unit_price".into(),
            multiplier: 1.5,
        };
        let out = remove_outliers(&input, "product", &[rule.clone()]).unwrap();
        assert_eq!(out.rows_removed, 1);
        assert!(out.table.column_values(0).all(|v| v != Some("1000")));

        // Every surviving value is within the bounds computed over the input batch.
        let bounds = resolve_bounds(&input, 0, &rule).unwrap();
        assert!(out.table.numeric_values(0).into_iter().all(|v| bounds.contains(v)));
    }

    #[test]
    fn test_null_and_text_values_are_dropped() {
        let input = single_column("amount_spent", &[None, Some("n/a"), Some("300")]);
        let rule = OutlierRule::Range {
            column: "amount_spent".into(),
            lower: 200.0,
            upper: 10000.0,
            inclusive: false,
        };
        let out = remove_outliers(&input, "customer", &[rule]).unwrap();
        assert_eq!(out.table.len(), 1);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let input = single_column("price", &[Some("1")]);
        let rule = OutlierRule::Iqr {
            column: "unit_price".into(),
            multiplier: 1.5,
        };
        assert_eq!(
            remove_outliers(&input, "product", &[rule]).unwrap_err(),
            DomainError::missing_column("product", "unit_price")
        );
    }
}
