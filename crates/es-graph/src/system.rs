//! The time-indexed energy-system container.

use std::collections::HashMap;

use es_core::{NodeId, TimeIndex};
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::node::{Edge, Node};
use crate::registry::NodeRegistry;
use crate::validate;

/// Nodes of one scenario together with the time index they are optimised over.
///
/// Labels are unique within a system. The container is append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SystemData", into = "SystemData")]
pub struct EnergySystem {
    timeindex: TimeIndex,
    nodes: Vec<Node>,
    by_label: HashMap<String, NodeId>,
}

#[derive(Serialize, Deserialize)]
struct SystemData {
    timeindex: TimeIndex,
    nodes: Vec<Node>,
}

impl TryFrom<SystemData> for EnergySystem {
    type Error = GraphError;

    fn try_from(data: SystemData) -> GraphResult<Self> {
        let mut es = EnergySystem::new(data.timeindex);
        for node in data.nodes {
            es.add(node)?;
        }
        Ok(es)
    }
}

impl From<EnergySystem> for SystemData {
    fn from(es: EnergySystem) -> Self {
        SystemData {
            timeindex: es.timeindex,
            nodes: es.nodes,
        }
    }
}

impl EnergySystem {
    pub fn new(timeindex: TimeIndex) -> Self {
        Self {
            timeindex,
            nodes: Vec::new(),
            by_label: HashMap::new(),
        }
    }

    /// Add a node, returning its ID.
    pub fn add(&mut self, node: Node) -> GraphResult<NodeId> {
        if node.label().is_empty() {
            return Err(GraphError::EmptyLabel);
        }
        if self.by_label.contains_key(node.label()) {
            return Err(GraphError::DuplicateKey {
                key: node.label().to_string(),
            });
        }
        let id = NodeId::from_index(self.nodes.len());
        self.by_label.insert(node.label().to_string(), id);
        self.nodes.push(node);
        Ok(id)
    }

    /// Add every node of a finished build pass.
    pub fn add_all(&mut self, registry: NodeRegistry<Node>) -> GraphResult<()> {
        for node in registry.into_nodes() {
            self.add(node)?;
        }
        Ok(())
    }

    pub fn timeindex(&self) -> &TimeIndex {
        &self.timeindex
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_by_label(&self, label: &str) -> Option<&Node> {
        self.by_label.get(label).and_then(|&id| self.node(id))
    }

    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.by_label.get(label).copied()
    }

    /// All flows as directed edges, in node order.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> {
        self.nodes.iter().flat_map(|n| n.edges())
    }

    /// Check bus references, profile lengths and parameter ranges.
    pub fn validate(&self) -> GraphResult<()> {
        validate::validate_system(self)
    }
}
