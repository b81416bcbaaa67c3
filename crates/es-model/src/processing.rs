//! Turning a solution into result facets.

use std::collections::BTreeMap;

use es_graph::{EnergySystem, Node};
use es_results::{
    MetaResults, ParamEntry, ParamSnapshot, ResultKey, SequenceKind, SequenceResult,
};

use crate::model::Model;
use crate::solve::Solution;

/// Flow sequences for every flow and content sequences for every storage.
///
/// Storage content is reported at the end of each step.
pub fn results(model: &Model, solution: &Solution) -> Vec<SequenceResult> {
    let index = model.index();
    let mut main = Vec::with_capacity(index.flow_count() + model.storages().len());

    for (f, key) in index.flow_keys().iter().enumerate() {
        main.push(SequenceResult {
            key: ResultKey::flow(key.from.clone(), key.to.clone()),
            kind: SequenceKind::Flow,
            values: model
                .flow_vars(f)
                .iter()
                .map(|&v| clean(solution.values[v]))
                .collect(),
        });
    }

    for storage in model.storages() {
        main.push(SequenceResult {
            key: ResultKey::node(storage.label.clone()),
            kind: SequenceKind::StorageContent,
            values: storage.content[1..]
                .iter()
                .map(|&v| clean(solution.values[v]))
                .collect(),
        });
    }

    main
}

/// Solve metadata. Input location and file date are left for the caller.
pub fn meta_results(model: &Model, solution: &Solution) -> MetaResults {
    MetaResults {
        objective: solution.objective,
        solver: solution.solver.name().to_string(),
        status: "optimal".to_string(),
        variables: model.variables().len(),
        constraints: model.constraints().len(),
        solve_time_s: solution.solve_time_s,
        in_location: None,
        file_date: None,
        framework_version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Snapshot of the parameters every flow and node was modelled with.
pub fn parameters(es: &EnergySystem) -> Vec<ParamEntry> {
    let steps = es.timeindex().len();
    let mut entries = Vec::new();

    for edge in es.edges() {
        let mut params = ParamSnapshot::default();
        let flow = edge.flow;
        if let Some(v) = flow.nominal_value {
            params.scalars.insert("nominal_value".to_string(), v);
        }
        params
            .scalars
            .insert("variable_costs".to_string(), flow.variable_costs);
        for (name, profile) in [("max", &flow.max), ("fix", &flow.fix)] {
            if let Some(p) = profile {
                params
                    .sequences
                    .insert(name.to_string(), p.iter().take(steps).copied().collect());
            }
        }
        entries.push(ParamEntry {
            key: ResultKey::flow(edge.from, edge.to),
            params,
        });
    }

    for node in es.nodes() {
        let scalars: BTreeMap<String, f64> = match node {
            Node::Converter(conv) => conv
                .outputs
                .iter()
                .map(|o| {
                    (
                        format!("conversion_factor_{}", o.flow.bus),
                        o.conversion_factor,
                    )
                })
                .collect(),
            Node::Storage(s) => [
                ("capacity", s.capacity),
                ("initial_level", s.initial_level),
                ("loss_rate", s.loss_rate),
                ("inflow_efficiency", s.inflow_efficiency),
                ("outflow_efficiency", s.outflow_efficiency),
                ("balanced", if s.balanced { 1.0 } else { 0.0 }),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
            _ => continue,
        };
        entries.push(ParamEntry {
            key: ResultKey::node(node.label()),
            params: ParamSnapshot {
                scalars,
                sequences: BTreeMap::new(),
            },
        });
    }

    entries
}

/// Flush solver noise around zero.
fn clean(v: f64) -> f64 {
    if v.abs() < 1e-9 { 0.0 } else { v }
}
