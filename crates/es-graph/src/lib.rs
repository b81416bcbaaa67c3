//! es-graph: node vocabulary and energy-system container.
//!
//! Provides:
//! - Node types (Bus, Source, Sink, Converter, Storage) and their flows
//! - `NodeRegistry`, a write-once mapping used while translating scenario
//!   tables into nodes
//! - `EnergySystem`, the time-indexed container handed to the model layer
//! - Stable indexing for solver integration and petgraph export
//!
//! # Example
//!
//! ```
//! use es_core::TimeIndex;
//! use es_graph::{Bus, EnergySystem, Flow, Node, NodeRegistry, Sink, Source};
//!
//! let mut nodes = NodeRegistry::new();
//! nodes.register("electricity", Node::Bus(Bus::new("electricity"))).unwrap();
//! nodes
//!     .register("pp", Node::Source(Source::new("pp", Flow::new("electricity"))))
//!     .unwrap();
//! assert!(nodes.register("pp", Node::Bus(Bus::new("pp"))).is_err());
//!
//! let mut es = EnergySystem::new(TimeIndex::for_year(Some(2019), true).unwrap());
//! es.add_all(nodes).unwrap();
//! assert_eq!(es.nodes().len(), 2);
//! ```

pub mod error;
pub mod export;
pub mod indexing;
pub mod node;
pub mod registry;
pub mod system;
pub(crate) mod validate;

pub use error::{GraphError, GraphResult};
pub use export::{FlowEdge, to_digraph};
pub use indexing::{FlowKey, IndexMap};
pub use node::{
    Bus, ConversionOutput, Converter, Edge, Flow, Node, NodeKind, Sink, Source, Storage,
};
pub use registry::NodeRegistry;
pub use system::EnergySystem;
