//! Linear optimisation model for energy systems.
//!
//! This crate turns a validated [`es_graph::EnergySystem`] into a linear
//! program (one variable per flow and time step, bus balances, conversion
//! ratios and storage balances), writes it as an LP file, solves it through
//! `good_lp` and processes the solution into result sequences.

pub mod error;
pub mod lp_file;
pub mod model;
pub mod processing;
pub mod solve;

pub use error::{ModelError, ModelResult};
pub use lp_file::write_lp;
pub use model::{LinearConstraint, Model, Sense, VariableDef};
pub use processing::{meta_results, parameters, results};
pub use solve::{Solution, SolverKind, solve};
