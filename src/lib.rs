pub mod catalog;
pub mod config;
pub mod enrich;
pub mod models;
pub mod paces;
pub mod parser;
pub mod pipeline;
pub mod prescribe;
pub mod repair;

#[cfg(test)]
mod test_utils;

pub use catalog::{CatalogError, LibraryCatalog, WorkoutCatalog};
pub use config::{ConfigError, PipelineConfig};
pub use models::Plan;
pub use paces::{derive_single_goal_paces, PaceError};
pub use pipeline::{compile_plan, PlanError};
