//! Scenario service layer.
//!
//! Ties table loading, node creation, model building, solving and result
//! persistence together behind [`Scenario`], for use by the CLI and tests.

pub mod config;
pub mod error;
pub mod node_factory;
pub mod scenario;

pub use config::{AppConfig, GeneralConfig, PathsConfig};
pub use error::{AppError, AppResult};
pub use node_factory::{NodeFactory, TableNodeFactory};
pub use scenario::{DEFAULT_SCENARIO_NAME, PlotOptions, Scenario};
