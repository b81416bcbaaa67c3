use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{TimeZone, Utc};
use es_core::TimeIndex;
use es_graph::{Bus, EnergySystem, Flow, Node, Source};
use es_results::*;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn sample_dump() -> Dump {
    let mut es = EnergySystem::new(TimeIndex::for_year(Some(2019), true).unwrap());
    es.add(Node::Bus(Bus::new("b_el"))).unwrap();
    es.add(Node::Source(Source::new(
        "pp",
        Flow::new("b_el").with_nominal_value(10.0),
    )))
    .unwrap();

    let mut scalars = BTreeMap::new();
    scalars.insert("nominal_value".to_string(), 10.0);

    let results = ResultBundle {
        main: vec![SequenceResult {
            key: ResultKey::flow("pp", "b_el"),
            kind: SequenceKind::Flow,
            values: vec![1.0, 2.0, 3.0],
        }],
        meta: MetaResults {
            objective: 6.0,
            solver: "microlp".to_string(),
            status: "optimal".to_string(),
            variables: 3,
            constraints: 3,
            solve_time_s: 0.01,
            in_location: Some("scenario.xlsx".to_string()),
            file_date: Some(Utc.with_ymd_and_hms(2026, 2, 25, 12, 0, 0).unwrap()),
            framework_version: "0.1.0".to_string(),
        },
        param: vec![ParamEntry {
            key: ResultKey::flow("pp", "b_el"),
            params: ParamSnapshot {
                scalars,
                sequences: BTreeMap::new(),
            },
        }],
        scenario: ScenarioInfo {
            name: "test".to_string(),
            datetime: Utc.with_ymd_and_hms(2026, 2, 26, 0, 0, 0).unwrap(),
            year: Some(2019),
        },
    };

    Dump {
        energy_system: es,
        results: Some(results),
    }
}

#[test]
fn dump_and_restore() {
    let dir = unique_temp_dir("es_results_store");
    let store = DumpStore::new(dir.clone()).unwrap();
    let dump = sample_dump();

    let path = store.dump("berlin.json", &dump).unwrap();
    assert_eq!(path, dir.join("berlin.json"));
    assert!(path.exists());

    let restored = store.restore("berlin.json").unwrap();
    assert_eq!(restored.results, dump.results);
    assert_eq!(restored.energy_system.nodes(), dump.energy_system.nodes());
    assert_eq!(
        restored.results.unwrap().flow("pp", "b_el"),
        Some(&[1.0, 2.0, 3.0][..])
    );

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn missing_dump_is_reported() {
    let dir = unique_temp_dir("es_results_missing");
    let store = DumpStore::new(dir.clone()).unwrap();
    assert!(matches!(
        store.restore("nothing.json"),
        Err(ResultsError::DumpNotFound { .. })
    ));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn for_file_splits_directory_and_name() {
    let dir = unique_temp_dir("es_results_split");
    let (store, name) = DumpStore::for_file(&dir.join("berlin.esys")).unwrap();
    assert_eq!(name, "berlin.esys");
    assert!(dir.is_dir());
    let written = store.dump(&name, &sample_dump()).unwrap();
    assert_eq!(written, dir.join("berlin.esys"));
    let _ = fs::remove_dir_all(dir);
}
