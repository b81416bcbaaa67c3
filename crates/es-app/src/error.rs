//! Error types for the es-app service layer.

use std::path::PathBuf;

/// Application error type wrapping the errors of the backend crates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Core(#[from] es_core::CoreError),

    #[error("{0}")]
    Graph(#[from] es_graph::GraphError),

    #[error("Table error: {0}")]
    Table(#[from] es_tables::TableError),

    #[error("Model error: {0}")]
    Model(#[from] es_model::ModelError),

    #[error("Results error: {0}")]
    Results(#[from] es_results::ResultsError),

    #[error("Plot error: {0}")]
    Viz(#[from] es_viz::VizError),

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Table '{table}', row '{row}', column {column}: {message}")]
    Factory {
        table: String,
        row: String,
        column: String,
        message: String,
    },

    #[error("No {what} available; {hint}")]
    Missing {
        what: &'static str,
        hint: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for es-app operations.
pub type AppResult<T> = Result<T, AppError>;
