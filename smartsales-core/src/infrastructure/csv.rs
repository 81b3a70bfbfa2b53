// smartsales-core/src/infrastructure/csv.rs

use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::domain::table::{Cell, Table};
use crate::infrastructure::error::InfrastructureError;

/// Field values read as missing, on top of the empty field.
pub const NA_MARKERS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A"];

fn to_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() || NA_MARKERS.contains(&trimmed) {
        None
    } else {
        Some(field.to_string())
    }
}

fn parse_error(path: &Path, err: &csv::Error) -> InfrastructureError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let message = match err.kind() {
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
            format!("found {} fields, expected {}", len, expected_len)
        }
        csv::ErrorKind::Utf8 { err, .. } => format!("invalid UTF-8 ({})", err),
        _ => err.to_string(),
    };
    InfrastructureError::Parse {
        path: path.to_path_buf(),
        line,
        message,
    }
}

/// Reads a comma-separated UTF-8 file whose first record is the header.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_table(path: &Path) -> Result<Table, InfrastructureError> {
    if !path.exists() {
        return Err(InfrastructureError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .map_err(|e| parse_error(path, &e))?;

    let headers = reader.headers().map_err(|e| parse_error(path, &e))?;
    let columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut table = Table::new(columns);

    for record in reader.records() {
        let record = record.map_err(|e| parse_error(path, &e))?;
        table.push_row(record.iter().map(to_cell).collect())?;
    }

    info!(shape = ?table.shape(), "Loaded table");
    debug!(columns = ?table.columns(), nulls = table.null_count(), "Table profile");
    Ok(table)
}

/// Writes `table` to `path`, overwriting it. Nulls become empty fields.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn save_table(table: &Table, path: &Path) -> Result<(), InfrastructureError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(std::io::Error::from)?;
    writer
        .write_record(table.columns())
        .map_err(std::io::Error::from)?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))
            .map_err(std::io::Error::from)?;
    }
    writer.flush()?;

    info!(shape = ?table.shape(), "Saved table");
    Ok(())
}
