//! DOT text output.

use std::fmt::Write as _;

use es_graph::{FlowEdge, NodeKind};
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;

use crate::options::DrawOptions;

/// Render `graph` as a DOT digraph.
///
/// Buses are drawn as ellipses, every other node as a box.
pub fn to_dot(graph: &DiGraph<(String, NodeKind), FlowEdge>, options: &DrawOptions) -> String {
    let width = options.node_size.max(0.0).sqrt() / 72.0;
    let mut out = String::new();

    out.push_str("digraph energy_system {\n");
    let _ = writeln!(out, "  layout=\"{}\";", options.layout.program());
    let _ = writeln!(
        out,
        "  node [style=filled, fixedsize=false, width={:.2}, height={:.2}];",
        width, width
    );
    let arrowhead = if options.arrows { "normal" } else { "none" };
    let _ = writeln!(
        out,
        "  edge [color=\"{}\", arrowhead={}];",
        escape(&options.edge_color),
        arrowhead
    );

    for v in graph.node_indices() {
        let (label, kind) = &graph[v];
        let shape = if *kind == NodeKind::Bus { "ellipse" } else { "box" };
        let text = if options.with_labels { label.as_str() } else { "" };
        let _ = writeln!(
            out,
            "  n{} [label=\"{}\", shape={}, fillcolor=\"{}\"];",
            v.index(),
            escape(text),
            shape,
            escape(options.node_color.for_label(label))
        );
    }

    for edge in graph.edge_references() {
        let _ = write!(out, "  n{} -> n{}", edge.source().index(), edge.target().index());
        if options.edge_labels
            && let Some(nominal) = edge.weight().nominal_value
        {
            let _ = write!(out, " [label=\"{}\"]", nominal);
        }
        out.push_str(";\n");
    }

    out.push('}');
    out.push('\n');
    out
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
