//! Node vocabulary of an energy system.

use serde::{Deserialize, Serialize};

/// A directed flow between a node and a bus.
///
/// `max` caps the flow at `nominal_value * max[t]`; `fix` pins it to
/// `nominal_value * fix[t]`. Without a nominal value the flow is unbounded
/// above and profiles are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub bus: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nominal_value: Option<f64>,
    #[serde(default)]
    pub variable_costs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Vec<f64>>,
}

impl Flow {
    pub fn new(bus: impl Into<String>) -> Self {
        Self {
            bus: bus.into(),
            nominal_value: None,
            variable_costs: 0.0,
            max: None,
            fix: None,
        }
    }

    pub fn with_nominal_value(mut self, value: f64) -> Self {
        self.nominal_value = Some(value);
        self
    }

    pub fn with_variable_costs(mut self, costs: f64) -> Self {
        self.variable_costs = costs;
        self
    }

    pub fn with_max(mut self, profile: Vec<f64>) -> Self {
        self.max = Some(profile);
        self
    }

    pub fn with_fix(mut self, profile: Vec<f64>) -> Self {
        self.fix = Some(profile);
        self
    }

    /// Upper bound at step `t`, if any.
    pub fn upper_bound(&self, t: usize) -> Option<f64> {
        let nominal = self.nominal_value?;
        let factor = self
            .max
            .as_ref()
            .and_then(|p| p.get(t).copied())
            .unwrap_or(1.0);
        Some(nominal * factor)
    }

    /// Fixed value at step `t`, if the flow is fixed.
    pub fn fixed_value(&self, t: usize) -> Option<f64> {
        let nominal = self.nominal_value?;
        let factor = self.fix.as_ref()?.get(t).copied()?;
        Some(nominal * factor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    pub label: String,
}

impl Bus {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// Feeds a bus, e.g. a power plant, an import or a shortage slack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub label: String,
    pub output: Flow,
}

impl Source {
    pub fn new(label: impl Into<String>, output: Flow) -> Self {
        Self {
            label: label.into(),
            output,
        }
    }
}

/// Drains a bus, e.g. a demand or an excess slack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sink {
    pub label: String,
    pub input: Flow,
}

impl Sink {
    pub fn new(label: impl Into<String>, input: Flow) -> Self {
        Self {
            label: label.into(),
            input,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionOutput {
    pub flow: Flow,
    pub conversion_factor: f64,
}

/// Turns one input flow into one or more outputs with fixed ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Converter {
    pub label: String,
    pub input: Flow,
    pub outputs: Vec<ConversionOutput>,
}

impl Converter {
    pub fn new(label: impl Into<String>, input: Flow) -> Self {
        Self {
            label: label.into(),
            input,
            outputs: Vec::new(),
        }
    }

    pub fn with_output(mut self, flow: Flow, conversion_factor: f64) -> Self {
        self.outputs.push(ConversionOutput {
            flow,
            conversion_factor,
        });
        self
    }
}

/// Generic storage attached to a single bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    pub label: String,
    pub capacity: f64,
    #[serde(default)]
    pub initial_level: f64,
    #[serde(default)]
    pub loss_rate: f64,
    pub inflow_efficiency: f64,
    pub outflow_efficiency: f64,
    /// Content at the end of the horizon equals the initial content.
    pub balanced: bool,
    pub input: Flow,
    pub output: Flow,
}

impl Storage {
    /// Storage with lossless charging through `input` and `output`.
    pub fn new(label: impl Into<String>, capacity: f64, input: Flow, output: Flow) -> Self {
        Self {
            label: label.into(),
            capacity,
            initial_level: 0.0,
            loss_rate: 0.0,
            inflow_efficiency: 1.0,
            outflow_efficiency: 1.0,
            balanced: true,
            input,
            output,
        }
    }

    pub fn with_efficiencies(mut self, inflow: f64, outflow: f64) -> Self {
        self.inflow_efficiency = inflow;
        self.outflow_efficiency = outflow;
        self
    }

    pub fn with_loss_rate(mut self, loss_rate: f64) -> Self {
        self.loss_rate = loss_rate;
        self
    }

    pub fn with_initial_level(mut self, level: f64) -> Self {
        self.initial_level = level;
        self
    }

    pub fn balanced(mut self, balanced: bool) -> Self {
        self.balanced = balanced;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Bus,
    Source,
    Sink,
    Converter,
    Storage,
}

/// A component of the energy-system graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    Bus(Bus),
    Source(Source),
    Sink(Sink),
    Converter(Converter),
    Storage(Storage),
}

/// A flow seen as a directed edge `from -> to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub flow: &'a Flow,
}

impl Node {
    pub fn label(&self) -> &str {
        match self {
            Node::Bus(n) => &n.label,
            Node::Source(n) => &n.label,
            Node::Sink(n) => &n.label,
            Node::Converter(n) => &n.label,
            Node::Storage(n) => &n.label,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Bus(_) => NodeKind::Bus,
            Node::Source(_) => NodeKind::Source,
            Node::Sink(_) => NodeKind::Sink,
            Node::Converter(_) => NodeKind::Converter,
            Node::Storage(_) => NodeKind::Storage,
        }
    }

    /// Flows attached to this node, oriented in the direction of energy.
    ///
    /// Buses own no flows; every edge is owned by the non-bus endpoint.
    pub fn edges(&self) -> Vec<Edge<'_>> {
        match self {
            Node::Bus(_) => Vec::new(),
            Node::Source(n) => vec![Edge {
                from: &n.label,
                to: &n.output.bus,
                flow: &n.output,
            }],
            Node::Sink(n) => vec![Edge {
                from: &n.input.bus,
                to: &n.label,
                flow: &n.input,
            }],
            Node::Converter(n) => {
                let mut edges = Vec::with_capacity(n.outputs.len() + 1);
                edges.push(Edge {
                    from: &n.input.bus,
                    to: &n.label,
                    flow: &n.input,
                });
                for out in &n.outputs {
                    edges.push(Edge {
                        from: &n.label,
                        to: &out.flow.bus,
                        flow: &out.flow,
                    });
                }
                edges
            }
            Node::Storage(n) => vec![
                Edge {
                    from: &n.input.bus,
                    to: &n.label,
                    flow: &n.input,
                },
                Edge {
                    from: &n.label,
                    to: &n.output.bus,
                    flow: &n.output,
                },
            ],
        }
    }
}
