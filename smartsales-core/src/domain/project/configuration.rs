// smartsales-core/src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::domain::cleaning::{CustomerRules, ProductRules, SaleRules};
use crate::domain::reporting::{ALL_GOALS, CubeColumns, ReportGoal};
use crate::domain::warehouse::WarehouseTable;

/// The three datasets flowing through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Customers,
    Products,
    Sales,
}

pub const ALL_ENTITIES: [Entity; 3] = [Entity::Customers, Entity::Products, Entity::Sales];

impl Entity {
    pub fn name(&self) -> &'static str {
        match self {
            Entity::Customers => "customers",
            Entity::Products => "products",
            Entity::Sales => "sales",
        }
    }

    pub fn warehouse_table(&self) -> WarehouseTable {
        match self {
            Entity::Customers => WarehouseTable::Customer,
            Entity::Products => WarehouseTable::Product,
            Entity::Sales => WarehouseTable::Sale,
        }
    }

    pub fn for_table(table: WarehouseTable) -> Self {
        match table {
            WarehouseTable::Customer => Entity::Customers,
            WarehouseTable::Product => Entity::Products,
            WarehouseTable::Sale => Entity::Sales,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the warehouse loader does when a single row fails to insert.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorPolicy {
    /// Record the failure and keep loading the rest of the table.
    #[default]
    SkipRow,
    /// Roll the whole table back to empty on its first failed row.
    AbortTable,
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
pub struct ProjectConfig {
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[validate(nested)]
    #[serde(default)]
    pub paths: PathsConfig,

    #[validate(nested)]
    #[serde(default)]
    pub sources: SourceFiles,

    #[validate(nested)]
    #[serde(default)]
    pub cleaning: CleaningConfig,

    #[serde(default)]
    pub load: LoadConfig,

    #[validate(nested)]
    #[serde(default)]
    pub reporting: ReportingConfig,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct PathsConfig {
    #[validate(length(min = 1))]
    #[serde(default = "default_raw_dir")]
    pub raw: String,

    #[validate(length(min = 1))]
    #[serde(default = "default_prepared_dir")]
    pub prepared: String,

    #[validate(length(min = 1))]
    #[serde(default = "default_warehouse")]
    pub warehouse: String,

    #[validate(length(min = 1))]
    #[serde(default = "default_cube")]
    pub cube: String,

    #[validate(length(min = 1))]
    #[serde(default = "default_results_dir")]
    pub results: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw: default_raw_dir(),
            prepared: default_prepared_dir(),
            warehouse: default_warehouse(),
            cube: default_cube(),
            results: default_results_dir(),
        }
    }
}

/// Raw file names inside the raw directory.
#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct SourceFiles {
    #[validate(length(min = 1))]
    #[serde(default = "default_customers_file")]
    pub customers: String,

    #[validate(length(min = 1))]
    #[serde(default = "default_products_file")]
    pub products: String,

    #[validate(length(min = 1))]
    #[serde(default = "default_sales_file")]
    pub sales: String,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            customers: default_customers_file(),
            products: default_products_file(),
            sales: default_sales_file(),
        }
    }
}

impl SourceFiles {
    pub fn raw_file(&self, entity: Entity) -> &str {
        match entity {
            Entity::Customers => &self.customers,
            Entity::Products => &self.products,
            Entity::Sales => &self.sales,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone, Default, PartialEq)]
pub struct CleaningConfig {
    #[validate(nested)]
    #[serde(default)]
    pub customers: CustomerRules,

    #[validate(nested)]
    #[serde(default)]
    pub products: ProductRules,

    #[validate(nested)]
    #[serde(default)]
    pub sales: SaleRules,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct LoadConfig {
    #[serde(default)]
    pub on_row_error: RowErrorPolicy,

    /// Treat any failed table or row as a failed run.
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct ReportingConfig {
    #[validate(nested)]
    #[serde(default)]
    pub columns: CubeColumns,

    #[serde(default = "default_goals")]
    pub goals: Vec<ReportGoal>,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            columns: CubeColumns::default(),
            goals: default_goals(),
        }
    }
}

/// Every location the pipeline touches, resolved against the project directory.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelinePaths {
    pub raw_dir: PathBuf,
    pub prepared_dir: PathBuf,
    pub warehouse: PathBuf,
    pub cube: PathBuf,
    pub results_dir: PathBuf,
    pub target_dir: PathBuf,
    sources: SourceFiles,
}

impl PipelinePaths {
    pub fn raw_file(&self, entity: Entity) -> PathBuf {
        self.raw_dir.join(self.sources.raw_file(entity))
    }

    /// `customers_data.csv` -> `customers_data_prepared.csv`
    pub fn prepared_file(&self, entity: Entity) -> PathBuf {
        let raw = Path::new(self.sources.raw_file(entity));
        let stem = raw
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| entity.name().to_string());
        self.prepared_dir.join(format!("{}_prepared.csv", stem))
    }

    pub fn result_file(&self, goal: ReportGoal) -> PathBuf {
        self.results_dir.join(format!("{}.csv", goal.name()))
    }

    pub fn run_results(&self) -> PathBuf {
        self.target_dir.join("run_results.json")
    }
}

impl ProjectConfig {
    /// Relative paths are taken from `project_dir`; absolute ones are kept.
    pub fn resolve_paths(&self, project_dir: &Path) -> PipelinePaths {
        let resolve = |p: &str| {
            let path = Path::new(p);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                project_dir.join(path)
            }
        };

        PipelinePaths {
            raw_dir: resolve(&self.paths.raw),
            prepared_dir: resolve(&self.paths.prepared),
            warehouse: resolve(&self.paths.warehouse),
            cube: resolve(&self.paths.cube),
            results_dir: resolve(&self.paths.results),
            target_dir: resolve(&self.target_path),
            sources: self.sources.clone(),
        }
    }
}

fn default_version() -> String {
    "0.1.0".to_string()
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_raw_dir() -> String {
    "data/raw".to_string()
}
fn default_prepared_dir() -> String {
    "data/prepared".to_string()
}
fn default_warehouse() -> String {
    "data/dw/smart_sales.db".to_string()
}
fn default_cube() -> String {
    "data/olap_cubing_outputs/multidimensional_olap_cube.csv".to_string()
}
fn default_results_dir() -> String {
    "data/results".to_string()
}
fn default_customers_file() -> String {
    "customers_data.csv".to_string()
}
fn default_products_file() -> String {
    "products_data.csv".to_string()
}
fn default_sales_file() -> String {
    "sales_data.csv".to_string()
}
fn default_goals() -> Vec<ReportGoal> {
    ALL_GOALS.to_vec()
}
