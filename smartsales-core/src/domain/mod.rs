pub mod cleaning;
pub mod error;
pub mod project;
pub mod reporting;
pub mod stats;
pub mod table;
pub mod warehouse;

pub use error::DomainError;
