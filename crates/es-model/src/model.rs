//! Linear program built from an energy system.

use std::collections::HashSet;

use es_graph::{EnergySystem, IndexMap, Node, NodeKind};

use crate::error::ModelResult;

/// A continuous decision variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDef {
    pub name: String,
    pub lower: f64,
    pub upper: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Eq,
    Le,
    Ge,
}

/// `Σ coef·x  (sense)  rhs`, with terms referring to variable indices.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub terms: Vec<(usize, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

/// Storage content variables of one storage node.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageVars {
    pub label: String,
    /// Content at each step boundary, `steps + 1` entries.
    pub content: Vec<usize>,
}

/// The optimisation model of one energy system.
///
/// Minimises the variable costs of all flows subject to:
/// - bus balance: inflows equal outflows in every step
/// - converters: each output equals its conversion factor times the input
/// - storages: content follows charging, discharging and losses
#[derive(Debug, Clone)]
pub struct Model {
    steps: usize,
    index: IndexMap,
    variables: Vec<VariableDef>,
    constraints: Vec<LinearConstraint>,
    objective: Vec<(usize, f64)>,
    /// flow index -> variable per step
    flow_vars: Vec<Vec<usize>>,
    storages: Vec<StorageVars>,
    /// Every variable and constraint name handed out so far.
    names: HashSet<String>,
}

impl Model {
    /// Build the model. The system is validated first.
    pub fn new(es: &EnergySystem) -> ModelResult<Self> {
        es.validate()?;
        let index = IndexMap::from_system(es)?;
        let steps = es.timeindex().len();

        let mut model = Self {
            steps,
            index,
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: Vec::new(),
            flow_vars: Vec::new(),
            storages: Vec::new(),
            names: HashSet::new(),
        };

        model.add_flow_variables(es);
        model.add_bus_balances(es);
        for node in es.nodes() {
            match node {
                Node::Converter(conv) => {
                    let input = model.flow_of(&conv.input.bus, &conv.label)?;
                    for (k, out) in conv.outputs.iter().enumerate() {
                        let output = model.flow_of(&conv.label, &out.flow.bus)?;
                        for t in 0..steps {
                            let terms = vec![
                                (model.flow_vars[output][t], 1.0),
                                (model.flow_vars[input][t], -out.conversion_factor),
                            ];
                            model.add_constraint(
                                format!("conversion_{}_{}_{}", symbol(&conv.label), k, t),
                                terms,
                                Sense::Eq,
                                0.0,
                            );
                        }
                    }
                }
                Node::Storage(storage) => {
                    let input = model.flow_of(&storage.input.bus, &storage.label)?;
                    let output = model.flow_of(&storage.label, &storage.output.bus)?;
                    model.add_storage(storage, input, output);
                }
                _ => {}
            }
        }

        Ok(model)
    }

    fn flow_of(&self, from: &str, to: &str) -> ModelResult<usize> {
        Ok(self.index.flow_idx(&es_graph::FlowKey::new(from, to))?)
    }

    /// `name`, or `name_<n>` with the smallest free `n` if it is taken.
    ///
    /// Labels like `pp-1` and `pp_1` share a symbol, so names are only
    /// unique after this step.
    fn unique_name(&mut self, name: String) -> String {
        let mut candidate = name.clone();
        let mut n = 1;
        while self.names.contains(&candidate) {
            candidate = format!("{}_{}", name, n);
            n += 1;
        }
        self.names.insert(candidate.clone());
        candidate
    }

    fn add_variable(&mut self, name: String, lower: f64, upper: Option<f64>) -> usize {
        let name = self.unique_name(name);
        self.variables.push(VariableDef { name, lower, upper });
        self.variables.len() - 1
    }

    fn add_constraint(&mut self, name: String, terms: Vec<(usize, f64)>, sense: Sense, rhs: f64) {
        let name = self.unique_name(name);
        self.constraints.push(LinearConstraint {
            name,
            terms,
            sense,
            rhs,
        });
    }

    fn add_flow_variables(&mut self, es: &EnergySystem) {
        let flows: Vec<_> = es.edges().collect();
        for (i, edge) in flows.iter().enumerate() {
            debug_assert_eq!(self.index.flow_key(i).from, edge.from);
            let mut vars = Vec::with_capacity(self.steps);
            for t in 0..self.steps {
                let name = format!("flow_{}_{}_{}", symbol(edge.from), symbol(edge.to), t);
                let var = match edge.flow.fixed_value(t) {
                    Some(v) => self.add_variable(name, v, Some(v)),
                    None => self.add_variable(name, 0.0, edge.flow.upper_bound(t)),
                };
                if edge.flow.variable_costs != 0.0 {
                    self.objective.push((var, edge.flow.variable_costs));
                }
                vars.push(var);
            }
            self.flow_vars.push(vars);
        }
    }

    fn add_bus_balances(&mut self, es: &EnergySystem) {
        let buses = self.index.bus_ids().to_vec();
        for bus in buses {
            let label = es.node(bus).map(Node::label).unwrap_or_default();
            debug_assert_eq!(es.node(bus).map(Node::kind), Some(NodeKind::Bus));
            for t in 0..self.steps {
                let mut terms = Vec::new();
                for &f in self.index.inflows(bus) {
                    terms.push((self.flow_vars[f][t], 1.0));
                }
                for &f in self.index.outflows(bus) {
                    terms.push((self.flow_vars[f][t], -1.0));
                }
                let name = format!("balance_{}_{}", symbol(label), t);
                self.add_constraint(name, terms, Sense::Eq, 0.0);
            }
        }
    }

    fn add_storage(&mut self, storage: &es_graph::Storage, input: usize, output: usize) {
        let initial = storage.initial_level * storage.capacity;
        let mut content = Vec::with_capacity(self.steps + 1);
        for t in 0..=self.steps {
            let name = format!("content_{}_{}", symbol(&storage.label), t);
            let var = if t == 0 {
                self.add_variable(name, initial, Some(initial))
            } else {
                self.add_variable(name, 0.0, Some(storage.capacity))
            };
            content.push(var);
        }

        let retained = 1.0 - storage.loss_rate;
        for t in 0..self.steps {
            let terms = vec![
                (content[t + 1], 1.0),
                (content[t], -retained),
                (self.flow_vars[input][t], -storage.inflow_efficiency),
                (self.flow_vars[output][t], 1.0 / storage.outflow_efficiency),
            ];
            self.add_constraint(
                format!("storage_balance_{}_{}", symbol(&storage.label), t),
                terms,
                Sense::Eq,
                0.0,
            );
        }

        if storage.balanced {
            self.add_constraint(
                format!("storage_end_{}", symbol(&storage.label)),
                vec![(content[self.steps], 1.0)],
                Sense::Eq,
                initial,
            );
        }

        self.storages.push(StorageVars {
            label: storage.label.clone(),
            content,
        });
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn index(&self) -> &IndexMap {
        &self.index
    }

    pub fn variables(&self) -> &[VariableDef] {
        &self.variables
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &[(usize, f64)] {
        &self.objective
    }

    /// Variables of flow `flow` (an [`IndexMap`] flow index), one per step.
    pub fn flow_vars(&self, flow: usize) -> &[usize] {
        &self.flow_vars[flow]
    }

    pub fn storages(&self) -> &[StorageVars] {
        &self.storages
    }

    /// Objective value for a full variable assignment.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.iter().map(|&(i, c)| c * values[i]).sum()
    }
}

/// LP-safe rendering of a label.
pub(crate) fn symbol(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
