//! Energy-system validation logic.

use crate::error::{GraphError, GraphResult};
use crate::node::{Flow, Node, NodeKind};
use crate::system::EnergySystem;

/// Validate the system: flows end at buses, profiles cover the horizon and
/// parameters are in range.
pub(crate) fn validate_system(es: &EnergySystem) -> GraphResult<()> {
    let steps = es.timeindex().len();

    for node in es.nodes() {
        let label = node.label();
        for edge in node.edges() {
            check_bus(es, label, &edge.flow.bus)?;
            check_flow(label, edge.flow, steps)?;
        }

        match node {
            Node::Converter(conv) => {
                for out in &conv.outputs {
                    check_non_negative(label, "conversion factor", out.conversion_factor)?;
                }
            }
            Node::Storage(storage) => {
                check_non_negative(label, "capacity", storage.capacity)?;
                check_fraction(label, "initial level", storage.initial_level)?;
                check_fraction(label, "loss rate", storage.loss_rate)?;
                check_efficiency(label, "inflow efficiency", storage.inflow_efficiency)?;
                check_efficiency(label, "outflow efficiency", storage.outflow_efficiency)?;
            }
            _ => {}
        }
    }

    Ok(())
}

fn check_bus(es: &EnergySystem, node: &str, bus: &str) -> GraphResult<()> {
    match es.node_by_label(bus) {
        Some(n) if n.kind() == NodeKind::Bus => Ok(()),
        Some(_) => Err(GraphError::NotABus {
            node: node.to_string(),
            bus: bus.to_string(),
        }),
        None => Err(GraphError::UnknownBus {
            node: node.to_string(),
            bus: bus.to_string(),
        }),
    }
}

fn check_flow(node: &str, flow: &Flow, steps: usize) -> GraphResult<()> {
    if let Some(nominal) = flow.nominal_value {
        check_non_negative(node, "nominal value", nominal)?;
    }
    if !flow.variable_costs.is_finite() {
        return Err(invalid(node, "variable costs", flow.variable_costs));
    }

    for profile in [&flow.max, &flow.fix].into_iter().flatten() {
        if profile.len() < steps {
            return Err(GraphError::ProfileTooShort {
                node: node.to_string(),
                len: profile.len(),
                expected: steps,
            });
        }
        for &value in profile {
            check_non_negative(node, "profile value", value)?;
        }
    }
    Ok(())
}

fn check_non_negative(node: &str, what: &'static str, value: f64) -> GraphResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(node, what, value))
    }
}

fn check_fraction(node: &str, what: &'static str, value: f64) -> GraphResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(node, what, value))
    }
}

fn check_efficiency(node: &str, what: &'static str, value: f64) -> GraphResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(node, what, value))
    }
}

fn invalid(node: &str, what: &'static str, value: f64) -> GraphError {
    GraphError::InvalidParameter {
        node: node.to_string(),
        what,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Bus, Flow, Sink, Source, Storage};
    use es_core::TimeIndex;

    fn system(nodes: Vec<Node>) -> EnergySystem {
        let mut es = EnergySystem::new(TimeIndex::for_year(Some(2019), true).unwrap());
        for node in nodes {
            es.add(node).unwrap();
        }
        es
    }

    #[test]
    fn valid_system_passes() {
        let es = system(vec![
            Node::Bus(Bus::new("el")),
            Node::Source(Source::new("pp", Flow::new("el").with_nominal_value(5.0))),
            Node::Sink(Sink::new(
                "demand",
                Flow::new("el").with_nominal_value(1.0).with_fix(vec![1.0, 2.0, 3.0]),
            )),
        ]);
        assert!(es.validate().is_ok());
    }

    #[test]
    fn unknown_bus_is_reported() {
        let es = system(vec![Node::Source(Source::new("pp", Flow::new("gas")))]);
        assert_eq!(
            es.validate(),
            Err(GraphError::UnknownBus {
                node: "pp".into(),
                bus: "gas".into()
            })
        );
    }

    #[test]
    fn flow_to_non_bus_is_reported() {
        let es = system(vec![
            Node::Bus(Bus::new("el")),
            Node::Source(Source::new("pp", Flow::new("el"))),
            Node::Sink(Sink::new("demand", Flow::new("pp"))),
        ]);
        assert!(matches!(es.validate(), Err(GraphError::NotABus { .. })));
    }

    #[test]
    fn short_profile_is_reported() {
        let es = system(vec![
            Node::Bus(Bus::new("el")),
            Node::Sink(Sink::new(
                "demand",
                Flow::new("el").with_nominal_value(1.0).with_fix(vec![1.0]),
            )),
        ]);
        assert!(matches!(
            es.validate(),
            Err(GraphError::ProfileTooShort {
                len: 1,
                expected: 3,
                ..
            })
        ));
    }

    #[test]
    fn storage_efficiency_must_be_positive() {
        let es = system(vec![
            Node::Bus(Bus::new("el")),
            Node::Storage(
                Storage::new("battery", 10.0, Flow::new("el"), Flow::new("el"))
                    .with_efficiencies(0.0, 0.9),
            ),
        ]);
        assert!(matches!(
            es.validate(),
            Err(GraphError::InvalidParameter {
                what: "inflow efficiency",
                ..
            })
        ));
    }
}
