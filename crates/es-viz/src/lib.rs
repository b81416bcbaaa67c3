//! Diagrams of energy-system graphs.
//!
//! Graphs are written as Graphviz DOT text. Images are produced by piping
//! that text through the Graphviz layout program selected in
//! [`DrawOptions::layout`].

pub mod dot;
pub mod error;
pub mod options;
pub mod render;

pub use dot::to_dot;
pub use error::{VizError, VizResult};
pub use options::{DEFAULT_EDGE_COLOR, DEFAULT_NODE_COLOR, DrawOptions, Layout, NodeColor};
pub use render::render;
