pub mod goals;

pub use goals::{ALL_GOALS, CubeColumns, ReportGoal};
