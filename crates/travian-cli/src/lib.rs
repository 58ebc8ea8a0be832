//! Support code for the `travian` command-line client.

pub mod config;
pub mod plan;

pub use config::{Config, ConfigError};
pub use plan::{parse_plan, PlanError};
