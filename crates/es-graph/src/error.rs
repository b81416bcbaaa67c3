//! Graph-specific error types.

/// Node registration and energy-system validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// An identifier was registered twice.
    DuplicateKey { key: String },

    /// An identifier was looked up but never registered.
    NotFound { key: String },

    /// A flow refers to a bus label that doesn't exist.
    UnknownBus { node: String, bus: String },

    /// A flow refers to a node that exists but isn't a bus.
    NotABus { node: String, bus: String },

    /// A node was created with an empty label.
    EmptyLabel,

    /// A profile is shorter than the time index.
    ProfileTooShort {
        node: String,
        len: usize,
        expected: usize,
    },

    /// A numeric parameter is outside its valid range.
    InvalidParameter {
        node: String,
        what: &'static str,
        value: f64,
    },

    /// Two flows share the same endpoints.
    DuplicateFlow { from: String, to: String },

    /// ID not found in index map.
    IdNotFound { what: &'static str },
}

pub type GraphResult<T> = Result<T, GraphError>;

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::DuplicateKey { key } => write!(
                f,
                "Key '{}' already exists. Duplicate keys are not allowed in a node dictionary.",
                key
            ),
            GraphError::NotFound { key } => {
                write!(f, "Key '{}' is not registered", key)
            }
            GraphError::UnknownBus { node, bus } => {
                write!(f, "Node '{}' refers to non-existent bus '{}'", node, bus)
            }
            GraphError::NotABus { node, bus } => {
                write!(f, "Node '{}' connects to '{}', which is not a bus", node, bus)
            }
            GraphError::EmptyLabel => write!(f, "Node labels must not be empty"),
            GraphError::ProfileTooShort {
                node,
                len,
                expected,
            } => write!(
                f,
                "Profile of node '{}' has {} values but the time index has {} steps",
                node, len, expected
            ),
            GraphError::InvalidParameter { node, what, value } => {
                write!(f, "Node '{}' has invalid {}: {}", node, what, value)
            }
            GraphError::DuplicateFlow { from, to } => {
                write!(f, "Flow ({}, {}) is defined more than once", from, to)
            }
            GraphError::IdNotFound { what } => {
                write!(f, "{} not found in index map", what)
            }
        }
    }
}

impl std::error::Error for GraphError {}
