//! Conversion of an energy system into a petgraph directed graph.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::node::NodeKind;
use crate::system::EnergySystem;

/// Edge weight of the exported graph.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowEdge {
    pub nominal_value: Option<f64>,
    pub variable_costs: f64,
}

/// Build a directed graph with one vertex per node label and one edge per flow.
///
/// Nodes whose label contains any of `remove_substrings` are dropped together
/// with their edges. Vertex weights are `(label, kind)`.
pub fn to_digraph(
    es: &EnergySystem,
    remove_substrings: &[&str],
) -> DiGraph<(String, NodeKind), FlowEdge> {
    let keep = |label: &str| !remove_substrings.iter().any(|s| label.contains(s));

    let mut graph = DiGraph::new();
    let mut vertices: HashMap<&str, NodeIndex> = HashMap::new();

    for node in es.nodes() {
        if keep(node.label()) {
            let v = graph.add_node((node.label().to_string(), node.kind()));
            vertices.insert(node.label(), v);
        }
    }

    for edge in es.edges() {
        if let (Some(&a), Some(&b)) = (vertices.get(edge.from), vertices.get(edge.to)) {
            graph.add_edge(
                a,
                b,
                FlowEdge {
                    nominal_value: edge.flow.nominal_value,
                    variable_costs: edge.flow.variable_costs,
                },
            );
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Bus, Flow, Node, Sink, Source};
    use es_core::TimeIndex;

    #[test]
    fn removal_drops_vertices_and_edges() {
        let mut es = EnergySystem::new(TimeIndex::for_year(Some(2019), true).unwrap());
        es.add(Node::Bus(Bus::new("el"))).unwrap();
        es.add(Node::Source(Source::new(
            "pp",
            Flow::new("el").with_nominal_value(3.0),
        )))
        .unwrap();
        es.add(Node::Source(Source::new("shortage_el", Flow::new("el"))))
            .unwrap();
        es.add(Node::Sink(Sink::new("demand", Flow::new("el"))))
            .unwrap();

        let full = to_digraph(&es, &[]);
        assert_eq!(full.node_count(), 4);
        assert_eq!(full.edge_count(), 3);

        let trimmed = to_digraph(&es, &["shortage"]);
        assert_eq!(trimmed.node_count(), 3);
        assert_eq!(trimmed.edge_count(), 2);
        assert!(
            trimmed
                .edge_weights()
                .any(|w| w.nominal_value == Some(3.0))
        );
    }
}
