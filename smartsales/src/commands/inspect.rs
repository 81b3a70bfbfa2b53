// smartsales/src/commands/inspect.rs
//
// USE CASE: Inspect a warehouse table (schema + sample rows).

use std::path::PathBuf;

use comfy_table::{Table as ConsoleTable, presets::UTF8_FULL};
use smartsales_core::domain::warehouse::WarehouseTable;
use smartsales_core::infrastructure::adapters::SqliteWarehouse;
use smartsales_core::ports::warehouse::WarehouseConnector;

pub fn execute(project_dir: PathBuf, table: WarehouseTable, limit: usize) -> anyhow::Result<()> {
    let config = super::load_config(&project_dir)?;
    let paths = config.resolve_paths(&project_dir);

    if !paths.warehouse.exists() {
        anyhow::bail!(
            "❌ Warehouse not found at: {}\n👉 Have you run 'smartsales load'?",
            paths.warehouse.display()
        );
    }

    let warehouse = SqliteWarehouse::open(&paths.warehouse)?;
    let columns = warehouse.fetch_columns(table.name())?;
    if columns.is_empty() {
        anyhow::bail!("❌ Table '{}' does not exist yet in {}", table, paths.warehouse.display());
    }

    println!("\n🔍 Inspecting Table: '{}' ({})", table, warehouse.engine_name());
    println!("   Rows: {}", warehouse.count_rows(table.name())?);

    let mut schema = ConsoleTable::new();
    schema.load_preset(UTF8_FULL);
    schema.set_header(vec!["column", "type", "nullable", "key"]);
    for c in &columns {
        schema.add_row(vec![
            c.name.clone(),
            c.data_type.clone(),
            if c.is_nullable { "yes" } else { "no" }.to_string(),
            if c.is_primary_key { "PK" } else { "" }.to_string(),
        ]);
    }
    println!("{schema}");

    let sample = warehouse.sample_rows(table.name(), limit)?;
    println!("   --- Rows (Limit {}) ---", limit);
    let mut rows = ConsoleTable::new();
    rows.load_preset(UTF8_FULL);
    rows.set_header(sample.columns().to_vec());
    for row in sample.rows() {
        rows.add_row(row.iter().map(|cell| cell.as_deref().unwrap_or("NULL")).collect::<Vec<_>>());
    }
    println!("{rows}");

    Ok(())
}
