//! End-to-end tests of the scenario build sequence.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use es_app::{AppConfig, AppError, PlotOptions, Scenario, TableNodeFactory};
use es_core::CoreError;
use es_graph::{Bus, Flow, GraphError, Node, NodeRegistry, Sink, Source};
use es_tables::{Cell, ColumnKey, Table, TableCollection, TableError};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn district_tables() -> TableCollection {
    let mut buses = Table::new(
        "bus",
        vec![
            ColumnKey::new("bus", "shortage_costs"),
            ColumnKey::new("bus", "excess_costs"),
        ],
    );
    buses.push_row("b_el", vec![1000.0.into(), 0.0.into()]).unwrap();

    let mut sources = Table::new(
        "label",
        vec![
            ColumnKey::new("output", "bus"),
            ColumnKey::new("output", "capacity"),
            ColumnKey::new("output", "variable_costs"),
            ColumnKey::new("output", "profile"),
        ],
    );
    sources
        .push_row(
            "pp_coal",
            vec!["b_el".into(), 100.0.into(), 20.0.into(), Cell::Empty],
        )
        .unwrap();
    sources
        .push_row(
            "wind",
            vec!["b_el".into(), 50.0.into(), 0.0.into(), "wind".into()],
        )
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
        .push_row("demand", vec!["b_el".into(), 40.0.into(), "demand".into()])
        .unwrap();

    let mut sequences = Table::new(
        "step",
        vec![
            ColumnKey::new("profile", "wind"),
            ColumnKey::new("profile", "demand"),
        ],
    );
    sequences.push_row("0", vec![0.5.into(), 1.0.into()]).unwrap();
    sequences.push_row("1", vec![0.2.into(), 0.5.into()]).unwrap();
    sequences.push_row("2", vec![0.0.into(), 0.75.into()]).unwrap();

    let mut tables = TableCollection::new();
    tables.insert("buses", buses);
    tables.insert("sources", sources);
    tables.insert("sinks", sinks);
    tables.insert("sequences", sequences);
    tables
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-6, "expected {:?}, got {:?}", expected, actual);
    }
}

#[test]
fn time_index_length_follows_the_year() {
    let mut scenario = Scenario::new("calendar");
    scenario.initialise_es(Some(2019)).unwrap();
    assert_eq!(scenario.es().unwrap().timeindex().len(), 8760);

    scenario.initialise_es(Some(2020)).unwrap();
    assert_eq!(scenario.es().unwrap().timeindex().len(), 8784);

    let mut debug = Scenario::new("calendar").with_debug(true);
    debug.initialise_es(Some(2020)).unwrap();
    assert_eq!(debug.es().unwrap().timeindex().len(), 3);
}

#[test]
fn missing_year_is_rejected() {
    let err = Scenario::new("no year").initialise_energy_system().unwrap_err();
    assert!(matches!(err, AppError::Core(CoreError::InvalidYear { .. })));
    assert_eq!(
        err.to_string(),
        "You cannot create an EnergySystem with year = None"
    );
}

#[test]
fn duplicate_node_fails_before_model_build() {
    let mut scenario = Scenario::new("dup").with_year(2019).with_debug(true);

    let mut nodes = NodeRegistry::new();
    nodes.register_node(Node::Bus(Bus::new("b_el"))).unwrap();
    nodes
        .register_node(Node::Source(Source::new("pp", Flow::new("b_el"))))
        .unwrap();
    let err = nodes
        .register_node(Node::Sink(Sink::new("pp", Flow::new("b_el"))))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Key 'pp' already exists. Duplicate keys are not allowed in a node dictionary."
    );
    assert!(matches!(
        nodes.lookup("pp"),
        Ok(Node::Source(_))
    ));

    // A second pass repeating a label already in the energy system fails too.
    scenario.add_nodes(nodes).unwrap();
    let mut again = NodeRegistry::new();
    again.register_node(Node::Bus(Bus::new("b_el"))).unwrap();
    assert!(matches!(
        scenario.add_nodes(again),
        Err(AppError::Graph(GraphError::DuplicateKey { .. }))
    ));
    assert!(scenario.model().is_none());
}

#[test]
fn check_table_names_columns_with_missing_values() {
    let mut tables = district_tables();
    let mut sinks = Table::new(
        "label",
        vec![
            ColumnKey::new("input", "bus"),
            ColumnKey::new("input", "capacity"),
        ],
    );
    sinks.push_row("demand", vec!["b_el".into(), Cell::Empty]).unwrap();
    tables.insert("sinks", sinks);
    let scenario = Scenario::new("gaps").with_tables(tables);

    assert!(scenario.check_table("buses").is_ok());
    let err = scenario.check_table("sinks").unwrap_err();
    assert!(matches!(
        err,
        AppError::Table(TableError::MissingValues { ref table, ref columns })
            if table == "sinks" && columns == &vec![ColumnKey::new("input", "capacity")]
    ));
    assert!(err.to_string().contains("(input, capacity)"));
    assert!(matches!(
        scenario.check_table("storages"),
        Err(AppError::Table(TableError::TableNotFound(_)))
    ));
}

#[test]
fn scenario_runs_end_to_end() {
    let dir = unique_temp_dir("es_app_scenario");
    let csv_dir = dir.join("tables");

    Scenario::new("district")
        .with_tables(district_tables())
        .to_csv(&csv_dir)
        .unwrap();

    let mut scenario = Scenario::new("district").with_year(2020).with_debug(true);
    scenario.load_csv(&csv_dir).unwrap();
    assert_eq!(scenario.table_collection.len(), 4);
    for name in ["buses", "sinks", "sequences"] {
        scenario.check_table(name).unwrap();
    }
    // pp_coal runs without a profile
    assert!(scenario.check_table("sources").is_err());

    scenario.add_nodes_from(&TableNodeFactory).unwrap();
    assert_eq!(scenario.es().unwrap().nodes().len(), 5);
    scenario.create_model().unwrap();

    let mut config = AppConfig::default();
    config.paths.lp_files = dir.join("lp_files");
    let bundle = scenario.solve(&config).unwrap();

    assert!((bundle.meta.objective - 1100.0).abs() < 1e-6);
    assert_eq!(bundle.meta.solver, "microlp");
    assert!(bundle.meta.file_date.is_some());
    assert_eq!(bundle.scenario.year, Some(2020));
    assert_close(bundle.flow("wind", "b_el").unwrap(), &[25.0, 10.0, 0.0]);
    assert_close(bundle.flow("pp_coal", "b_el").unwrap(), &[15.0, 10.0, 30.0]);
    assert_close(bundle.flow("shortage_b_el", "b_el").unwrap(), &[0.0, 0.0, 0.0]);
    assert!(dir.join("lp_files").join("district.lp").exists());

    let dump_path = dir.join("dumps").join("district.json");
    scenario.dump_es(&dump_path).unwrap();

    let mut restored = Scenario::new("district");
    restored.restore_es(&dump_path).unwrap();
    assert_eq!(restored.year, Some(2020));
    assert_eq!(restored.results(), scenario.results());
    assert_eq!(
        restored.es().unwrap().nodes(),
        scenario.es().unwrap().nodes()
    );

    let dot = restored
        .plot_nodes(&PlotOptions {
            remove_nodes_with_substrings: vec!["shortage".to_string()],
            ..PlotOptions::default()
        })
        .unwrap();
    assert!(dot.contains("\"wind\""));
    assert!(!dot.contains("shortage"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn adding_nodes_drops_the_built_model() {
    let mut scenario = Scenario::new("grow").with_year(2019).with_debug(true);

    let mut first = NodeRegistry::new();
    first.register_node(Node::Bus(Bus::new("b"))).unwrap();
    first
        .register_node(Node::Source(Source::new(
            "pp",
            Flow::new("b").with_nominal_value(10.0).with_variable_costs(1.0),
        )))
        .unwrap();
    scenario.add_nodes(first).unwrap();
    scenario.create_model().unwrap();
    assert!(scenario.model().is_some());

    let mut second = NodeRegistry::new();
    second
        .register_node(Node::Sink(Sink::new(
            "demand",
            Flow::new("b").with_nominal_value(1.0).with_fix(vec![2.0, 3.0, 4.0]),
        )))
        .unwrap();
    scenario.add_nodes(second).unwrap();
    assert!(scenario.model().is_none());

    let dir = unique_temp_dir("es_app_grow");
    let mut config = AppConfig::default();
    config.paths.lp_files = dir.clone();
    assert!(matches!(
        scenario.solve(&config),
        Err(AppError::Missing { what: "model", .. })
    ));

    scenario.create_model().unwrap();
    let bundle = scenario.solve(&config).unwrap();
    assert_close(bundle.flow("b", "demand").unwrap(), &[2.0, 3.0, 4.0]);
    assert_close(bundle.flow("pp", "b").unwrap(), &[2.0, 3.0, 4.0]);
    assert!((bundle.meta.objective - 9.0).abs() < 1e-6);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn dump_rejects_non_finite_parameters() {
    let dir = unique_temp_dir("es_app_dump_inf");
    let mut scenario = Scenario::new("inf").with_year(2019).with_debug(true);

    let mut nodes = NodeRegistry::new();
    nodes.register_node(Node::Bus(Bus::new("b"))).unwrap();
    nodes
        .register_node(Node::Source(Source::new(
            "shortage_b",
            Flow::new("b").with_variable_costs(f64::INFINITY),
        )))
        .unwrap();
    scenario.add_nodes(nodes).unwrap();

    let path = dir.join("inf.json");
    assert!(matches!(
        scenario.dump_es(&path),
        Err(AppError::Graph(GraphError::InvalidParameter {
            what: "variable costs",
            ..
        }))
    ));
    assert!(!path.exists());

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn steps_require_their_predecessors() {
    let mut scenario = Scenario::new("empty").with_year(2019);
    assert!(matches!(
        scenario.create_model(),
        Err(AppError::Missing { .. })
    ));
    scenario.initialise_es(None).unwrap();
    assert!(matches!(
        scenario.solve(&AppConfig::default()),
        Err(AppError::Missing { what: "model", .. })
    ));
}
