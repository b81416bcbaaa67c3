//! Stable indexing for solver integration.
//!
//! Provides bidirectional mappings between flows `(from, to)` and contiguous
//! solver indices (0..N), plus per-bus incidence lists.

use std::collections::HashMap;

use es_core::NodeId;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::node::NodeKind;
use crate::system::EnergySystem;

/// Identifies a flow by its endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlowKey {
    pub from: String,
    pub to: String,
}

impl FlowKey {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl std::fmt::Display for FlowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.from, self.to)
    }
}

/// Index map providing stable, contiguous indices for the flows of a system.
#[derive(Debug, Clone)]
pub struct IndexMap {
    /// Contiguous list of flow keys (index -> FlowKey), in node order.
    flow_keys: Vec<FlowKey>,

    /// Node owning each flow.
    flow_owner: Vec<NodeId>,

    /// Reverse lookup: FlowKey -> index.
    flow_to_idx: HashMap<FlowKey, usize>,

    /// Bus ID -> indices of flows entering the bus.
    bus_inflows: HashMap<NodeId, Vec<usize>>,

    /// Bus ID -> indices of flows leaving the bus.
    bus_outflows: HashMap<NodeId, Vec<usize>>,

    /// Bus IDs in node order.
    bus_ids: Vec<NodeId>,
}

impl IndexMap {
    /// Build an index map from a validated system.
    pub fn from_system(es: &EnergySystem) -> GraphResult<Self> {
        let mut map = Self {
            flow_keys: Vec::new(),
            flow_owner: Vec::new(),
            flow_to_idx: HashMap::new(),
            bus_inflows: HashMap::new(),
            bus_outflows: HashMap::new(),
            bus_ids: Vec::new(),
        };

        for (i, node) in es.nodes().iter().enumerate() {
            let owner = NodeId::from_index(i);
            if node.kind() == NodeKind::Bus {
                map.bus_ids.push(owner);
            }

            for edge in node.edges() {
                let key = FlowKey::new(edge.from, edge.to);
                if map.flow_to_idx.contains_key(&key) {
                    return Err(GraphError::DuplicateFlow {
                        from: key.from,
                        to: key.to,
                    });
                }
                let idx = map.flow_keys.len();
                map.flow_to_idx.insert(key.clone(), idx);
                map.flow_keys.push(key);
                map.flow_owner.push(owner);

                let bus = es
                    .node_id(&edge.flow.bus)
                    .ok_or(GraphError::IdNotFound { what: "bus" })?;
                if edge.to == edge.flow.bus {
                    map.bus_inflows.entry(bus).or_default().push(idx);
                } else {
                    map.bus_outflows.entry(bus).or_default().push(idx);
                }
            }
        }

        Ok(map)
    }

    /// Number of flows in the index.
    pub fn flow_count(&self) -> usize {
        self.flow_keys.len()
    }

    /// Get the contiguous index for a flow.
    pub fn flow_idx(&self, key: &FlowKey) -> GraphResult<usize> {
        self.flow_to_idx
            .get(key)
            .copied()
            .ok_or(GraphError::IdNotFound { what: "FlowKey" })
    }

    /// Get the flow key for a contiguous index (panics if out of bounds).
    pub fn flow_key(&self, i: usize) -> &FlowKey {
        &self.flow_keys[i]
    }

    /// Node owning the flow at index `i` (panics if out of bounds).
    pub fn flow_owner(&self, i: usize) -> NodeId {
        self.flow_owner[i]
    }

    /// All flow keys in index order.
    pub fn flow_keys(&self) -> &[FlowKey] {
        &self.flow_keys
    }

    /// Bus IDs in node order.
    pub fn bus_ids(&self) -> &[NodeId] {
        &self.bus_ids
    }

    /// Flows entering bus `bus`.
    pub fn inflows(&self, bus: NodeId) -> &[usize] {
        self.bus_inflows.get(&bus).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Flows leaving bus `bus`.
    pub fn outflows(&self, bus: NodeId) -> &[usize] {
        self.bus_outflows.get(&bus).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Bus, Converter, Flow, Node, Sink, Source};
    use es_core::TimeIndex;

    fn simple_system() -> EnergySystem {
        let mut es = EnergySystem::new(TimeIndex::for_year(Some(2019), true).unwrap());
        es.add(Node::Bus(Bus::new("el"))).unwrap();
        es.add(Node::Source(Source::new("pp", Flow::new("el"))))
            .unwrap();
        es.add(Node::Sink(Sink::new("demand", Flow::new("el"))))
            .unwrap();
        es
    }

    #[test]
    fn index_map_basic() {
        let es = simple_system();
        let idx = IndexMap::from_system(&es).unwrap();

        assert_eq!(idx.flow_count(), 2);
        let supply = idx.flow_idx(&FlowKey::new("pp", "el")).unwrap();
        let demand = idx.flow_idx(&FlowKey::new("el", "demand")).unwrap();
        assert_eq!(idx.flow_key(supply).to, "el");

        let bus = es.node_id("el").unwrap();
        assert_eq!(idx.bus_ids(), &[bus]);
        assert_eq!(idx.inflows(bus), &[supply]);
        assert_eq!(idx.outflows(bus), &[demand]);
    }

    #[test]
    fn repeated_converter_output_is_a_duplicate_flow() {
        let mut es = simple_system();
        es.add(Node::Bus(Bus::new("gas"))).unwrap();
        es.add(Node::Converter(
            Converter::new("chp", Flow::new("gas"))
                .with_output(Flow::new("el"), 0.4)
                .with_output(Flow::new("el"), 0.2),
        ))
        .unwrap();

        let err = IndexMap::from_system(&es).unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateFlow {
                from: "chp".into(),
                to: "el".into()
            }
        );
        assert!(err.to_string().starts_with("Flow (chp, el) is defined more than once"));
    }

    #[test]
    fn index_map_invalid_key() {
        let idx = IndexMap::from_system(&simple_system()).unwrap();
        assert!(idx.flow_idx(&FlowKey::new("el", "pp")).is_err());
    }
}
