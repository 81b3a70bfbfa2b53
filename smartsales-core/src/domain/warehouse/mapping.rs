// smartsales-core/src/domain/warehouse/mapping.rs

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::cleaning::normalize_column_name;
use crate::domain::error::DomainError;
use crate::domain::table::{Cell, Table, parse_number};
use crate::domain::warehouse::schema::{ColumnDef, SqlType, WarehouseTable};

/// Date layouts accepted in prepared files. Output is always ISO.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// A typed value ready to be bound to an insert.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

/// How the columns of a prepared file line up with one warehouse table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    pub table: WarehouseTable,
    /// `(prepared column index, warehouse column)` in prepared-file order.
    pub bindings: Vec<(usize, &'static ColumnDef)>,
    /// Prepared columns with no warehouse counterpart.
    pub ignored: Vec<String>,
}

impl ColumnMapping {
    pub fn column_names(&self) -> Vec<&'static str> {
        self.bindings.iter().map(|(_, def)| def.name).collect()
    }

    /// Converts one prepared row into insert parameters, in `column_names()` order.
    pub fn convert_row(&self, row: &[Cell]) -> Result<Vec<SqlValue>, DomainError> {
        self.bindings
            .iter()
            .map(|(idx, def)| convert_cell(def, row.get(*idx).and_then(|c| c.as_deref())))
            .collect()
    }
}

/// Warehouse column a prepared header maps to. Headers and aliases are
/// compared in their snake_case form, so raw and prepared spellings
/// (`SaleAmountUSD`, `sale_amount_usd`) resolve the same way.
pub fn canonical_column(table: WarehouseTable, header: &str) -> Option<&'static ColumnDef> {
    let normalized = normalize_column_name(header);
    let columns = table.columns();
    columns.iter().find(|c| c.name == normalized).or_else(|| {
        columns
            .iter()
            .find(|c| c.aliases.iter().any(|a| normalize_column_name(a) == normalized))
    })
}

/// Maps every prepared column onto `table`. A missing key column fails the table.
pub fn map_columns(table: WarehouseTable, prepared: &Table) -> Result<ColumnMapping, DomainError> {
    let mut bindings: Vec<(usize, &'static ColumnDef)> = Vec::new();
    let mut ignored = Vec::new();

    for (idx, header) in prepared.columns().iter().enumerate() {
        match canonical_column(table, header) {
            Some(def) if bindings.iter().all(|(_, b)| b.name != def.name) => bindings.push((idx, def)),
            _ => ignored.push(header.clone()),
        }
    }

    let key = table.primary_key();
    if bindings.iter().all(|(_, def)| def.name != key.name) {
        return Err(DomainError::missing_column(table.name(), key.name));
    }
    if !ignored.is_empty() {
        warn!(table = table.name(), ?ignored, "Prepared columns ignored by the warehouse");
    }

    Ok(ColumnMapping {
        table,
        bindings,
        ignored,
    })
}

pub fn convert_cell(def: &ColumnDef, cell: Option<&str>) -> Result<SqlValue, DomainError> {
    let Some(raw) = cell.map(str::trim).filter(|s| !s.is_empty()) else {
        if def.primary_key {
            return Err(invalid(def, "", "a non-null key"));
        }
        return Ok(SqlValue::Null);
    };

    match def.sql_type {
        SqlType::Text => Ok(SqlValue::Text(raw.to_string())),
        SqlType::Real => parse_number(Some(raw))
            .map(SqlValue::Real)
            .ok_or_else(|| invalid(def, raw, "a decimal number")),
        SqlType::Integer => parse_integer(raw)
            .map(SqlValue::Integer)
            .ok_or_else(|| invalid(def, raw, "an integer")),
        SqlType::Date => parse_date(raw)
            .map(|d| SqlValue::Text(d.format("%Y-%m-%d").to_string()))
            .ok_or_else(|| invalid(def, raw, "a date (YYYY-MM-DD or MM/DD/YYYY)")),
    }
}

// "12.0" is accepted: prepared files written after a median fill often carry
// integral values in float form.
fn parse_integer(raw: &str) -> Option<i64> {
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    let v = parse_number(Some(raw))?;
    (v.fract() == 0.0 && v.abs() < i64::MAX as f64).then_some(v as i64)
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn invalid(def: &ColumnDef, value: &str, expected: &'static str) -> DomainError {
    DomainError::InvalidValue {
        column: def.name.to_string(),
        value: value.to_string(),
        expected,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn prepared(columns: &[&str]) -> Table {
        Table::new(columns.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_aliases_and_normalization() {
        let def = |h| canonical_column(WarehouseTable::Customer, h).map(|d| d.name);
        assert_eq!(def("CustomerID"), Some("customer_id"));
        assert_eq!(def("customer_id"), Some("customer_id"));
        assert_eq!(def("AmountSpent"), Some("amount_spent"));
        assert_eq!(def("NumberOfPurchases"), Some("purchases"));
        assert_eq!(def("FavoriteColor"), None);
    }

    #[test]
    fn test_aliases_match_prepared_headers() {
        for table in [WarehouseTable::Customer, WarehouseTable::Product, WarehouseTable::Sale] {
            for def in table.columns() {
                for alias in def.aliases {
                    let prepared = normalize_column_name(alias);
                    assert_eq!(
                        canonical_column(table, &prepared).map(|d| d.name),
                        Some(def.name),
                        "{table}: {alias} -> {prepared}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_prepared_sales_headers_bind_every_value() {
        let table = prepared(&["transaction_id", "date", "sale_amount_usd", "loyalty_points", "membership_status"]);
        let mapping = map_columns(WarehouseTable::Sale, &table).unwrap();
        assert_eq!(
            mapping.column_names(),
            vec!["transaction_id", "sale_date", "sale_amount", "points_earned", "member_status"]
        );
        assert!(mapping.ignored.is_empty());
    }

    #[test]
    fn test_map_columns_reports_ignored() {
        let table = prepared(&["ProductID", "Price", "Discount", "product_id"]);
        let mapping = map_columns(WarehouseTable::Product, &table).unwrap();
        assert_eq!(mapping.column_names(), vec!["product_id", "unit_price"]);
        assert_eq!(mapping.ignored, vec!["Discount", "product_id"]);
    }

    #[test]
    fn test_map_columns_requires_key() {
        let table = prepared(&["sale_amount"]);
        assert_eq!(
            map_columns(WarehouseTable::Sale, &table).unwrap_err(),
            DomainError::missing_column("sale", "transaction_id")
        );
    }

    #[test]
    fn test_convert_row_types() {
        let table = prepared(&["TransactionID", "SaleDate", "SaleAmount", "PointsEarned", "StoreID"]);
        let mapping = map_columns(WarehouseTable::Sale, &table).unwrap();
        let row: Vec<Cell> = ["T9", "03/15/2024", "19.99", "12.0", ""]
            .iter()
            .map(|v| Some(v.to_string()))
            .collect();
        assert_eq!(
            mapping.convert_row(&row).unwrap(),
            vec![
                SqlValue::Text("T9".into()),
                SqlValue::Text("2024-03-15".into()),
                SqlValue::Real(19.99),
                SqlValue::Integer(12),
                SqlValue::Null,
            ]
        );
    }

    #[test]
    fn test_convert_rejects_bad_values() {
        let table = prepared(&["customer_id", "purchases", "join_date"]);
        let mapping = map_columns(WarehouseTable::Customer, &table).unwrap();

        let bad_int: Vec<Cell> = vec![Some("1".into()), Some("3.5".into()), None];
        assert!(matches!(
            mapping.convert_row(&bad_int),
            Err(DomainError::InvalidValue { column, .. }) if column == "purchases"
        ));

        let bad_date: Vec<Cell> = vec![Some("1".into()), None, Some("yesterday".into())];
        assert!(mapping.convert_row(&bad_date).is_err());

        let null_key: Vec<Cell> = vec![None, None, None];
        assert!(mapping.convert_row(&null_key).is_err());
    }
}
