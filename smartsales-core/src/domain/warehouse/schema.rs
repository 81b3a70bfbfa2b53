// smartsales-core/src/domain/warehouse/schema.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Real,
    /// Stored as ISO `YYYY-MM-DD` text.
    Date,
}

impl SqlType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Date => "DATE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub primary_key: bool,
    /// Header spellings that do not normalize to `name` on their own.
    pub aliases: &'static [&'static str],
}

const fn col(name: &'static str, sql_type: SqlType) -> ColumnDef {
    ColumnDef {
        name,
        sql_type,
        primary_key: false,
        aliases: &[],
    }
}

const fn key(name: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        sql_type: SqlType::Text,
        primary_key: true,
        aliases: &[],
    }
}

const fn aliased(name: &'static str, sql_type: SqlType, aliases: &'static [&'static str]) -> ColumnDef {
    ColumnDef {
        name,
        sql_type,
        primary_key: false,
        aliases,
    }
}

const CUSTOMER_COLUMNS: &[ColumnDef] = &[
    key("customer_id"),
    aliased("name", SqlType::Text, &["CustomerName"]),
    col("region", SqlType::Text),
    aliased("join_date", SqlType::Date, &["SignupDate"]),
    aliased("purchases", SqlType::Integer, &["NumberOfPurchases", "PurchaseCount"]),
    aliased("amount_spent", SqlType::Real, &["TotalSpent"]),
    col("state", SqlType::Text),
];

const PRODUCT_COLUMNS: &[ColumnDef] = &[
    key("product_id"),
    aliased("product_name", SqlType::Text, &["Name"]),
    col("category", SqlType::Text),
    aliased("unit_price", SqlType::Real, &["Price"]),
    aliased("quantity_in_stock", SqlType::Integer, &["Stock", "StockQuantity"]),
    col("supplier", SqlType::Text),
];

const SALE_COLUMNS: &[ColumnDef] = &[
    key("transaction_id"),
    col("customer_id", SqlType::Text),
    col("product_id", SqlType::Text),
    col("store_id", SqlType::Text),
    col("campaign_id", SqlType::Text),
    aliased("sale_date", SqlType::Date, &["Date"]),
    aliased("sale_amount", SqlType::Real, &["SaleAmountUSD", "Amount"]),
    aliased("member_status", SqlType::Text, &["MembershipStatus"]),
    aliased("points_earned", SqlType::Integer, &["LoyaltyPoints", "BonusPoints"]),
];

/// The three warehouse tables. Nothing else lives in the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarehouseTable {
    Customer,
    Product,
    Sale,
}

/// Dimensions before facts.
pub const LOAD_ORDER: [WarehouseTable; 3] = [
    WarehouseTable::Customer,
    WarehouseTable::Product,
    WarehouseTable::Sale,
];

/// Facts before dimensions, so foreign keys never dangle mid-reset.
pub const RESET_ORDER: [WarehouseTable; 3] = [
    WarehouseTable::Sale,
    WarehouseTable::Product,
    WarehouseTable::Customer,
];

impl WarehouseTable {
    pub fn name(&self) -> &'static str {
        match self {
            WarehouseTable::Customer => "customer",
            WarehouseTable::Product => "product",
            WarehouseTable::Sale => "sale",
        }
    }

    pub fn columns(&self) -> &'static [ColumnDef] {
        match self {
            WarehouseTable::Customer => CUSTOMER_COLUMNS,
            WarehouseTable::Product => PRODUCT_COLUMNS,
            WarehouseTable::Sale => SALE_COLUMNS,
        }
    }

    pub fn primary_key(&self) -> &'static ColumnDef {
        // Every column list starts with its key.
        &self.columns()[0]
    }

    /// `(column, referenced table)` pairs; the referenced column is that table's key.
    pub fn foreign_keys(&self) -> &'static [(&'static str, WarehouseTable)] {
        match self {
            WarehouseTable::Sale => &[
                ("customer_id", WarehouseTable::Customer),
                ("product_id", WarehouseTable::Product),
            ],
            _ => &[],
        }
    }

    pub fn create_sql(&self) -> String {
        let mut lines: Vec<String> = self
            .columns()
            .iter()
            .map(|c| {
                let mut line = format!("    {} {}", quote_ident(c.name), c.sql_type.as_sql());
                if c.primary_key {
                    line.push_str(" PRIMARY KEY");
                }
                line
            })
            .collect();

        for (column, target) in self.foreign_keys() {
            lines.push(format!(
                "    FOREIGN KEY ({}) REFERENCES {} ({})",
                quote_ident(column),
                quote_ident(target.name()),
                quote_ident(target.primary_key().name)
            ));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
            quote_ident(self.name()),
            lines.join(",\n")
        )
    }

    pub fn delete_sql(&self) -> String {
        format!("DELETE FROM {}", quote_ident(self.name()))
    }
}

impl fmt::Display for WarehouseTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WarehouseTable {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "customer" | "customers" => Ok(WarehouseTable::Customer),
            "product" | "products" => Ok(WarehouseTable::Product),
            "sale" | "sales" => Ok(WarehouseTable::Sale),
            other => Err(DomainError::InvalidRule(format!(
                "unknown warehouse table '{}' (expected customer, product or sale)",
                other
            ))),
        }
    }
}

/// Double-quoted SQL identifier.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
