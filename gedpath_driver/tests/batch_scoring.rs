use std::fs;
use std::path::Path;
use std::sync::Once;

use gedpath_common::{Config, GedMethod, MethodError};
use gedpath_driver::{
    Dataset, DriverError, EngineRun, GraphPair, PairScore, RunFileEngine, ScoreFormat,
    extract_pair, score_pairs, write_scores,
};
use gedpath_extract::{Correspondence, OpKind, verify};
use rstest::rstest;
use tempfile::TempDir;

static INIT: Once = Once::new();

fn setup_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

const TRIANGLE: &str = r#"{
    "nodes": [
        {"id": "a", "attrs": {"symbol": "C"}},
        {"id": "b", "attrs": {"symbol": "C"}},
        {"id": "c", "attrs": {"symbol": "O"}}
    ],
    "edges": [
        {"source": "a", "target": "b", "attrs": {"valence": 1}},
        {"source": "b", "target": "c", "attrs": {"valence": 2}},
        {"source": "a", "target": "c", "attrs": {"valence": 1}}
    ]
}"#;

const PATH: &str = r#"{
    "nodes": [
        {"id": 0, "attrs": {"symbol": "O"}},
        {"id": 1, "attrs": {"symbol": "C"}}
    ],
    "edges": [
        {"source": 0, "target": 1, "attrs": {"valence": 2}}
    ]
}"#;

const SINGLE: &str = r#"{"nodes": [{"id": "x", "attrs": {"symbol": "N"}}]}"#;

fn write_dataset(dir: &Path) {
    fs::write(dir.join("triangle.json"), TRIANGLE).unwrap();
    fs::write(dir.join("path.json"), PATH).unwrap();
    fs::write(dir.join("single.json"), SINGLE).unwrap();
    fs::write(
        dir.join("collection.json"),
        r#"{"graphs": [
            {"file": "triangle.json", "class": "ring"},
            {"file": "path.json", "class": "chain"},
            {"file": "single.json"}
        ]}"#,
    )
    .unwrap();
}

fn run(graph1: usize, graph2: usize, node_map: &[Option<usize>], bound: f64) -> EngineRun {
    EngineRun {
        method: GedMethod::Ipfp,
        graph1,
        graph2,
        node_map: Correspondence::from_node_map(node_map).unwrap(),
        lower_bound: None,
        upper_bound: Some(bound),
        runtime: 0.5,
    }
}

fn engine() -> RunFileEngine {
    RunFileEngine::from_runs([
        run(0, 1, &[Some(1), None, Some(0)], 4.0),
        run(0, 2, &[None, None, None], 7.0),
        run(1, 2, &[None, None], 4.0),
    ])
}

fn open(dir: &TempDir) -> Dataset {
    Dataset::open(dir.path(), "collection.json").unwrap()
}

#[rstest]
#[case(false)]
#[case(true)]
fn scores_every_pair_in_order(#[case] parallel: bool) {
    setup_test_logging();
    let dir = TempDir::new().unwrap();
    write_dataset(dir.path());
    let dataset = open(&dir);

    let config = Config::builder()
        .method(GedMethod::Ipfp)
        .parallel(parallel)
        .verify_paths(true)
        .build();
    let scores = score_pairs(&dataset, &engine(), &config).unwrap();

    let pairs: Vec<(usize, usize)> = scores.iter().map(|s| (s.graph1, s.graph2)).collect();
    assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    assert!(scores.iter().all(|s| s.method == 10 && s.gtged.is_none()));
    assert_eq!(scores[0].predged, 4.0);
    // Deleting a node drops its edges without extra operations.
    assert_eq!(scores[0].edit_cost, Some(2));
    assert_eq!(scores[1].edit_cost, Some(4));
    assert_eq!(scores[2].edit_cost, Some(3));
    assert_eq!(dataset.driver().loaded_len(), 3);
}

#[test]
fn start_index_skips_leading_graphs() {
    let dir = TempDir::new().unwrap();
    write_dataset(dir.path());
    let dataset = open(&dir);

    let config = Config::builder().start_index(1).parallel(false).build();
    let scores = score_pairs(&dataset, &engine(), &config).unwrap();

    assert_eq!(scores.len(), 1);
    assert_eq!((scores[0].graph1, scores[0].graph2), (1, 2));
    assert_eq!(scores[0].edit_cost, None);
}

#[test]
fn disallowed_method_fails_before_loading() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("collection.json"),
        r#"{"graphs": [{"file": "missing0.json"}, {"file": "missing1.json"}]}"#,
    )
    .unwrap();
    let dataset = open(&dir);

    let config = Config::builder().method(GedMethod::BipartiteMl).build();
    let err = score_pairs(&dataset, &engine(), &config).unwrap_err();

    assert!(matches!(err, DriverError::Method(MethodError::Disallowed(_))));
    assert_eq!(dataset.driver().loaded_len(), 0);
}

#[test]
fn missing_run_aborts_batch() {
    let dir = TempDir::new().unwrap();
    write_dataset(dir.path());
    let dataset = open(&dir);

    let config = Config::builder()
        .method(GedMethod::Refine)
        .parallel(false)
        .build();
    let err = score_pairs(&dataset, &engine(), &config).unwrap_err();
    assert!(matches!(err, DriverError::MissingRun { graph1: 0, graph2: 1, .. }));
}

#[test]
fn extracted_pair_replays_to_target() {
    let dir = TempDir::new().unwrap();
    write_dataset(dir.path());
    let dataset = open(&dir);

    let path = extract_pair(&dataset, &engine(), GedMethod::Ipfp, GraphPair::new(0, 1)).unwrap();

    assert_eq!(path.graph_edit_distance, 4.0);
    assert_eq!(path.count(OpKind::Delete), 1);
    assert_eq!(path.count(OpKind::SubstituteEdge), 1);
    assert_eq!(path.node_matches, 2);
    verify(&path, &dataset.graph(0).unwrap(), &dataset.graph(1).unwrap()).unwrap();
}

#[test]
fn out_of_range_index_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_dataset(dir.path());
    let dataset = open(&dir);

    let err = extract_pair(&dataset, &engine(), GedMethod::Ipfp, GraphPair::new(0, 3)).unwrap_err();
    assert!(matches!(err, DriverError::IndexOutOfRange { index: 3, len: 3 }));
    assert_eq!(
        err.to_string(),
        "graph index 3 out of range. Must be between 0 and 2"
    );
}

#[test]
fn text_output_parses_back() {
    let dir = TempDir::new().unwrap();
    write_dataset(dir.path());
    let dataset = open(&dir);
    let config = Config::builder().parallel(false).build();
    let scores = score_pairs(&dataset, &engine(), &config).unwrap();

    let mut out = Vec::new();
    write_scores(&scores, ScoreFormat::Text, false, &mut out).unwrap();
    let parsed: Vec<PairScore> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| line.parse().unwrap())
        .collect();
    assert_eq!(parsed, scores);
}

#[test]
fn run_file_is_read_from_disk() {
    let dir = TempDir::new().unwrap();
    let runs = dir.path().join("runs.json");
    fs::write(
        &runs,
        r#"[{"method": "BRANCH", "graph1": 1, "graph2": 2, "node_map": [0], "lower_bound": 2}]"#,
    )
    .unwrap();

    let engine = RunFileEngine::from_path(&runs).unwrap();
    assert_eq!(engine.len(), 1);

    let err = RunFileEngine::from_path(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, DriverError::Read { .. }));
}
