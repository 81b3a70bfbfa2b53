// smartsales-core/src/domain/project/mod.rs

pub mod configuration;
pub use configuration::{
    ALL_ENTITIES, CleaningConfig, Entity, LoadConfig, PathsConfig, PipelinePaths, ProjectConfig,
    ReportingConfig, RowErrorPolicy, SourceFiles,
};
