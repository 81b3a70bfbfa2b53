// smartsales-core/src/domain/cleaning/columns.rs

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::error::DomainError;
use crate::domain::table::Table;

fn compile(pattern: &str) -> Regex {
    // Patterns below are hardcoded; the fallback never matches anything.
    Regex::new(pattern).unwrap_or_else(|_| Regex::new("$^").unwrap_or_else(|_| unreachable!()))
}

// "amountSpent" -> "amount_Spent", "Item2Sold" -> "Item2_Sold"
fn re_lower_upper() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"([a-z0-9])([A-Z])"))
}

// "HTTPServer" -> "HTTP_Server", leaves "CustomerID" alone
fn re_acronym() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"([A-Z]+)([A-Z][a-z])"))
}

fn re_separators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"[\s\-_.]+"))
}

/// Canonical snake_case form of a raw header.
///
/// `"  Customer ID"`, `"CustomerID"` and `"customer_id"` all map to `"customer_id"`.
/// Applying it to its own output is a no-op.
pub fn normalize_column_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let split = re_acronym().replace_all(trimmed, "${1}_${2}");
    let split = re_lower_upper().replace_all(&split, "${1}_${2}");
    let joined = re_separators().replace_all(&split, "_");
    joined.trim_matches('_').to_lowercase()
}

/// Result of the header normalization step.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedColumns {
    pub table: Table,
    /// `(old, new)` pairs for every header that changed.
    pub renamed: Vec<(String, String)>,
}

/// Renames every column to its canonical form. Row data is untouched.
///
/// Two raw headers collapsing onto the same canonical name would make every
/// later rule ambiguous, so that case is rejected.
pub fn normalize_columns(table: &Table, entity: &str) -> Result<NormalizedColumns, DomainError> {
    let mut columns = Vec::with_capacity(table.columns().len());
    let mut renamed = Vec::new();

    for original in table.columns() {
        let canonical = normalize_column_name(original);
        if columns.contains(&canonical) {
            return Err(DomainError::InvalidRule(format!(
                "{} columns collide after normalization on '{}'",
                entity, canonical
            )));
        }
        if *original != canonical {
            renamed.push((original.clone(), canonical.clone()));
        }
        columns.push(canonical);
    }

    Ok(NormalizedColumns {
        table: table.with_columns(columns)?,
        renamed,
    })
}
