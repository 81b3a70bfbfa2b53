// smartsales-core/src/application/prepare.rs

use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, instrument};

use crate::domain::cleaning::{Cleaned, CleaningReport, clean_customers, clean_products, clean_sales};
use crate::domain::error::DomainError;
use crate::domain::project::{CleaningConfig, Entity, PipelinePaths};
use crate::domain::table::Table;
use crate::error::SmartSalesError;
use crate::infrastructure::csv::{load_table, save_table};

#[derive(Debug, Clone, Serialize)]
pub struct PrepareOutcome {
    pub entity: Entity,
    pub input: PathBuf,
    pub output: PathBuf,
    pub report: CleaningReport,
}

/// Runs the rule set of `entity` over an in-memory batch.
pub fn clean_entity(entity: Entity, table: &Table, rules: &CleaningConfig) -> Result<Cleaned, DomainError> {
    match entity {
        Entity::Customers => clean_customers(table, &rules.customers),
        Entity::Products => clean_products(table, &rules.products),
        Entity::Sales => clean_sales(table, &rules.sales),
    }
}

/// raw file -> cleaned table -> prepared file
#[instrument(skip(paths, rules))]
pub fn prepare_entity(
    entity: Entity,
    paths: &PipelinePaths,
    rules: &CleaningConfig,
) -> Result<PrepareOutcome, SmartSalesError> {
    let input = paths.raw_file(entity);
    let output = paths.prepared_file(entity);

    let raw = load_table(&input)?;
    let cleaned = clean_entity(entity, &raw, rules)?;
    save_table(&cleaned.table, &output)?;
    info!(output = %output.display(), rows = cleaned.table.len(), "Prepared data saved");

    Ok(PrepareOutcome {
        entity,
        input,
        output,
        report: cleaned.report,
    })
}

/// What one `prepare_all` call produced. A failing entity never stops the others.
#[derive(Debug, Default)]
pub struct PrepareBatch {
    pub outcomes: Vec<PrepareOutcome>,
    pub failures: Vec<(Entity, SmartSalesError)>,
}

impl PrepareBatch {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// A single failure is returned as is; several are folded into `PrepareFailed`.
    pub fn into_result(mut self) -> Result<Vec<PrepareOutcome>, SmartSalesError> {
        match self.failures.len() {
            0 => Ok(self.outcomes),
            1 => Err(self.failures.remove(0).1),
            count => Err(SmartSalesError::PrepareFailed {
                count,
                details: self
                    .failures
                    .iter()
                    .map(|(entity, e)| format!("{}: {}", entity, e))
                    .collect::<Vec<_>>()
                    .join("; "),
            }),
        }
    }
}

/// Prepares every entity in order. Each file is attempted even when an
/// earlier one failed.
pub fn prepare_all(entities: &[Entity], paths: &PipelinePaths, rules: &CleaningConfig) -> PrepareBatch {
    let mut batch = PrepareBatch::default();
    for entity in entities {
        match prepare_entity(*entity, paths, rules) {
            Ok(outcome) => batch.outcomes.push(outcome),
            Err(e) => {
                error!(entity = entity.name(), error = %e, "Data preparation failed");
                batch.failures.push((*entity, e));
            }
        }
    }
    batch
}
