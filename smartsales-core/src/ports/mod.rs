pub mod analytics;
pub mod warehouse;
