// smartsales/src/commands/mod.rs

pub mod inspect;
pub mod load;
pub mod prepare;
pub mod report;
pub mod run;

use std::path::Path;

use anyhow::Context;
use smartsales_core::domain::project::ProjectConfig;
use smartsales_core::infrastructure::config::load_project_config;

/// Loads `smartsales.yaml` and prints the project banner.
pub(crate) fn load_config(project_dir: &Path) -> anyhow::Result<ProjectConfig> {
    println!("⚙️  Loading configuration...");
    let config = load_project_config(project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    println!("   Project: {} (v{})", config.name, config.version);
    Ok(config)
}
