//! Error types for model construction and solving.

use thiserror::Error;

/// Errors that can occur while building or solving a model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Graph error: {0}")]
    Graph(#[from] es_graph::GraphError),

    #[error("Unknown solver '{name}' (available: microlp, clarabel)")]
    UnknownSolver { name: String },

    #[error("Solver failed: {0}")]
    Resolution(#[from] good_lp::ResolutionError),

    #[error("Solution does not match model: {what}")]
    SolutionMismatch { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;
