//! es-results: result bundles and their dump/restore store.

pub mod store;
pub mod types;

pub use store::{Dump, DumpStore};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dump not found: {path}")]
    DumpNotFound { path: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },
}
