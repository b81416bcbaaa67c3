//! Translation of scenario tables into energy-system nodes.

use std::collections::HashSet;

use es_graph::{Bus, Converter, Flow, Node, NodeRegistry, Sink, Source, Storage};
use es_tables::{Cell, ColumnKey, Table};

use crate::error::{AppError, AppResult};
use crate::scenario::Scenario;

/// Creates the nodes of one build pass from a scenario.
pub trait NodeFactory {
    fn create_nodes(&self, scenario: &Scenario) -> AppResult<NodeRegistry>;
}

/// Builds nodes from the `buses`, `sources`, `sinks`, `converters`,
/// `storages` and `sequences` tables.
///
/// Only `buses` is required. Every row becomes one node labelled by its
/// index; positive shortage or excess costs of a bus add the slack nodes
/// `shortage_<bus>` and `excess_<bus>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableNodeFactory;

impl NodeFactory for TableNodeFactory {
    fn create_nodes(&self, scenario: &Scenario) -> AppResult<NodeRegistry> {
        let tables = &scenario.table_collection;
        let mut nodes = NodeRegistry::new();

        let buses = tables.get("buses")?;
        let bus_labels: HashSet<&str> = buses.index().iter().map(String::as_str).collect();
        add_buses(&mut nodes, buses)?;

        let sequences = if tables.contains("sequences") {
            scenario.check_table("sequences")?;
            Some(tables.get("sequences")?)
        } else {
            None
        };
        let ctx = Context {
            buses: &bus_labels,
            sequences,
        };

        if tables.contains("sources") {
            add_sources(&mut nodes, &ctx, tables.get("sources")?)?;
        }
        if tables.contains("sinks") {
            add_sinks(&mut nodes, &ctx, tables.get("sinks")?)?;
        }
        if tables.contains("converters") {
            add_converters(&mut nodes, &ctx, tables.get("converters")?)?;
        }
        if tables.contains("storages") {
            add_storages(&mut nodes, &ctx, tables.get("storages")?)?;
        }

        Ok(nodes)
    }
}

struct Context<'a> {
    buses: &'a HashSet<&'a str>,
    sequences: Option<&'a Table>,
}

/// One row of a node table.
struct Row<'a> {
    table: &'static str,
    source: &'a Table,
    label: &'a str,
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    fn error(&self, group: &str, name: &str, message: impl Into<String>) -> AppError {
        AppError::Factory {
            table: self.table.to_string(),
            row: self.label.to_string(),
            column: ColumnKey::new(group, name).to_string(),
            message: message.into(),
        }
    }

    fn cell(&self, group: &str, name: &str) -> Option<&'a Cell> {
        let pos = self.source.column_position(&ColumnKey::new(group, name))?;
        self.cells.get(pos)
    }

    fn text(&self, group: &str, name: &str) -> AppResult<Option<String>> {
        match self.cell(group, name) {
            None | Some(Cell::Empty) => Ok(None),
            Some(Cell::Text(s)) => Ok(Some(s.trim().to_string())),
            Some(Cell::Number(v)) if v.is_nan() => Ok(None),
            Some(Cell::Number(v)) => Ok(Some(v.to_string())),
        }
    }

    fn number(&self, group: &str, name: &str) -> AppResult<Option<f64>> {
        match self.cell(group, name) {
            None | Some(Cell::Empty) => Ok(None),
            Some(Cell::Number(v)) if v.is_nan() => Ok(None),
            Some(Cell::Number(v)) => Ok(Some(*v)),
            Some(Cell::Text(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| self.error(group, name, format!("'{}' is not a number", s))),
        }
    }

    fn required_number(&self, group: &str, name: &str) -> AppResult<f64> {
        self.number(group, name)?
            .ok_or_else(|| self.error(group, name, "value is required"))
    }

    /// Bus label in `(group, name)`, checked against the `buses` table.
    fn bus(&self, ctx: &Context<'_>, group: &str, name: &str) -> AppResult<String> {
        let bus = self
            .text(group, name)?
            .ok_or_else(|| self.error(group, name, "bus is required"))?;
        if !ctx.buses.contains(bus.as_str()) {
            return Err(self.error(group, name, format!("unknown bus '{}'", bus)));
        }
        Ok(bus)
    }

    /// Sequence named in `(group, name)`, looked up in the `sequences` table.
    fn profile(&self, ctx: &Context<'_>, group: &str, name: &str) -> AppResult<Option<Vec<f64>>> {
        let Some(profile) = self.text(group, name)? else {
            return Ok(None);
        };
        let sequences = ctx
            .sequences
            .ok_or_else(|| self.error(group, name, "no 'sequences' table"))?;
        sequences
            .column_f64(&ColumnKey::new("profile", profile.as_str()))
            .map(Some)
            .ok_or_else(|| self.error(group, name, format!("unknown profile '{}'", profile)))
    }
}

fn rows<'a>(table: &'static str, source: &'a Table) -> impl Iterator<Item = Row<'a>> {
    source.rows().map(move |(label, cells)| Row {
        table,
        source,
        label,
        cells,
    })
}

fn add_buses(nodes: &mut NodeRegistry, table: &Table) -> AppResult<()> {
    for row in rows("buses", table) {
        nodes.register_node(Node::Bus(Bus::new(row.label)))?;

        let shortage = row.number("bus", "shortage_costs")?.unwrap_or(0.0);
        if shortage > 0.0 {
            nodes.register_node(Node::Source(Source::new(
                format!("shortage_{}", row.label),
                Flow::new(row.label).with_variable_costs(shortage),
            )))?;
        }
        let excess = row.number("bus", "excess_costs")?.unwrap_or(0.0);
        if excess > 0.0 {
            nodes.register_node(Node::Sink(Sink::new(
                format!("excess_{}", row.label),
                Flow::new(row.label).with_variable_costs(excess),
            )))?;
        }
    }
    Ok(())
}

/// Flow with optional capacity and a profile that caps or fixes it.
fn profiled_flow(
    row: &Row<'_>,
    ctx: &Context<'_>,
    group: &str,
    fixed: bool,
) -> AppResult<Flow> {
    let mut flow = Flow::new(row.bus(ctx, group, "bus")?)
        .with_variable_costs(row.number(group, "variable_costs")?.unwrap_or(0.0));
    let capacity = row.number(group, "capacity")?;
    if let Some(capacity) = capacity {
        flow = flow.with_nominal_value(capacity);
    }
    if let Some(profile) = row.profile(ctx, group, "profile")? {
        if capacity.is_none() {
            return Err(row.error(group, "capacity", "a profile needs a capacity"));
        }
        flow = if fixed {
            flow.with_fix(profile)
        } else {
            flow.with_max(profile)
        };
    }
    Ok(flow)
}

fn add_sources(nodes: &mut NodeRegistry, ctx: &Context<'_>, table: &Table) -> AppResult<()> {
    for row in rows("sources", table) {
        let fixed = row.number("output", "fixed")?.is_some_and(|v| v != 0.0);
        let output = profiled_flow(&row, ctx, "output", fixed)?;
        nodes.register_node(Node::Source(Source::new(row.label, output)))?;
    }
    Ok(())
}

fn add_sinks(nodes: &mut NodeRegistry, ctx: &Context<'_>, table: &Table) -> AppResult<()> {
    for row in rows("sinks", table) {
        let input = profiled_flow(&row, ctx, "input", true)?;
        nodes.register_node(Node::Sink(Sink::new(row.label, input)))?;
    }
    Ok(())
}

fn add_converters(nodes: &mut NodeRegistry, ctx: &Context<'_>, table: &Table) -> AppResult<()> {
    for row in rows("converters", table) {
        let input = Flow::new(row.bus(ctx, "input", "bus")?);
        let mut output = Flow::new(row.bus(ctx, "output", "bus")?)
            .with_variable_costs(row.number("output", "variable_costs")?.unwrap_or(0.0));
        if let Some(capacity) = row.number("output", "capacity")? {
            output = output.with_nominal_value(capacity);
        }
        let efficiency = row.required_number("conversion", "efficiency")?;
        nodes.register_node(Node::Converter(
            Converter::new(row.label, input).with_output(output, efficiency),
        ))?;
    }
    Ok(())
}

fn add_storages(nodes: &mut NodeRegistry, ctx: &Context<'_>, table: &Table) -> AppResult<()> {
    for row in rows("storages", table) {
        let bus = row.bus(ctx, "storage", "bus")?;
        let capacity = row.required_number("storage", "capacity")?;
        let mut input = Flow::new(bus.as_str());
        let mut output = Flow::new(bus.as_str());
        if let Some(power) = row.number("storage", "power")? {
            input = input.with_nominal_value(power);
            output = output.with_nominal_value(power);
        }
        let storage = Storage::new(row.label, capacity, input, output)
            .with_efficiencies(
                row.number("storage", "efficiency_in")?.unwrap_or(1.0),
                row.number("storage", "efficiency_out")?.unwrap_or(1.0),
            )
            .with_loss_rate(row.number("storage", "loss_rate")?.unwrap_or(0.0))
            .with_initial_level(row.number("storage", "initial_level")?.unwrap_or(0.0));
        nodes.register_node(Node::Storage(storage))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use es_graph::GraphError;
    use es_tables::TableCollection;

    fn buses() -> Table {
        let mut t = Table::new(
            "bus",
            vec![
                ColumnKey::new("bus", "shortage_costs"),
                ColumnKey::new("bus", "excess_costs"),
            ],
        );
        t.push_row("b_el", vec![1000.0.into(), 0.0.into()]).unwrap();
        t.push_row("b_gas", vec![Cell::Empty, Cell::Empty]).unwrap();
        t
    }

    fn scenario(tables: Vec<(&str, Table)>) -> Scenario {
        let mut collection = TableCollection::new();
        for (name, table) in tables {
            collection.insert(name, table);
        }
        Scenario::new("test").with_tables(collection)
    }

    #[test]
    fn buses_get_slack_nodes_for_positive_costs() {
        let nodes = TableNodeFactory
            .create_nodes(&scenario(vec![("buses", buses())]))
            .unwrap();
        assert!(nodes.contains("b_el"));
        assert!(nodes.contains("b_gas"));
        assert!(nodes.contains("shortage_b_el"));
        assert!(!nodes.contains("excess_b_el"));
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn unknown_bus_names_table_row_and_column() {
        let mut sources = Table::new("label", vec![ColumnKey::new("output", "bus")]);
        sources.push_row("pp_coal", vec!["b_heat".into()]).unwrap();

        let err = TableNodeFactory
            .create_nodes(&scenario(vec![("buses", buses()), ("sources", sources)]))
            .unwrap_err();
        match err {
            AppError::Factory {
                table, row, column, ..
            } => {
                assert_eq!(table, "sources");
                assert_eq!(row, "pp_coal");
                assert_eq!(column, "(output, bus)");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn profiles_cap_or_fix_flows() {
        let mut sources = Table::new(
            "label",
            vec![
                ColumnKey::new("output", "bus"),
                ColumnKey::new("output", "capacity"),
                ColumnKey::new("output", "profile"),
            ],
        );
        sources
            .push_row("wind", vec!["b_el".into(), 50.0.into(), "wind".into()])
            .unwrap();
        let mut sinks = Table::new(
            "label",
            vec![
                ColumnKey::new("input", "bus"),
                ColumnKey::new("input", "capacity"),
                ColumnKey::new("input", "profile"),
            ],
        );
        sinks
            .push_row("demand", vec!["b_el".into(), 10.0.into(), "demand".into()])
            .unwrap();
        let mut sequences = Table::new(
            "step",
            vec![
                ColumnKey::new("profile", "wind"),
                ColumnKey::new("profile", "demand"),
            ],
        );
        sequences.push_row("0", vec![0.5.into(), 1.0.into()]).unwrap();

        let nodes = TableNodeFactory
            .create_nodes(&scenario(vec![
                ("buses", buses()),
                ("sources", sources),
                ("sinks", sinks),
                ("sequences", sequences),
            ]))
            .unwrap();

        match nodes.lookup("wind").unwrap() {
            Node::Source(s) => {
                assert_eq!(s.output.max, Some(vec![0.5]));
                assert_eq!(s.output.fix, None);
            }
            other => panic!("unexpected node {other:?}"),
        }
        match nodes.lookup("demand").unwrap() {
            Node::Sink(s) => assert_eq!(s.input.fix, Some(vec![1.0])),
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn duplicate_labels_across_tables_are_rejected() {
        let mut sinks = Table::new("label", vec![ColumnKey::new("input", "bus")]);
        sinks.push_row("b_gas", vec!["b_el".into()]).unwrap();

        let err = TableNodeFactory
            .create_nodes(&scenario(vec![("buses", buses()), ("sinks", sinks)]))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Graph(GraphError::DuplicateKey { ref key }) if key == "b_gas"
        ));
    }
}
