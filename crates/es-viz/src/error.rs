use thiserror::Error;

#[derive(Error, Debug)]
pub enum VizError {
    #[error("Unknown layout '{name}' (expected one of neato, dot, twopi, circo, fdp, sfdp)")]
    UnknownLayout { name: String },

    #[error("Failed to run Graphviz program '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Graphviz program '{program}' failed: {stderr}")]
    Graphviz { program: String, stderr: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type VizResult<T> = Result<T, VizError>;
