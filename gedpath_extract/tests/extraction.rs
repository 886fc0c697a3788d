mod common;

use common::{colored_graph, setup_test_logging};
use gedpath_common::AttributedGraph;
use gedpath_extract::{
    Correspondence, ENDPOINT_DELETED_NOTE, EditOp, EditPathExtractor, ExtractError, NodeOrigin,
    OpKind, extract_edit_path, verify,
};
use rstest::rstest;

fn node_map(entries: &[Option<usize>]) -> Correspondence {
    Correspondence::from_node_map(entries).unwrap()
}

#[test]
fn identical_graphs_only_match() {
    setup_test_logging();
    let g = colored_graph(&["red", "blue"], &[(0, 1, "1")]);
    let path = extract_edit_path(&g, &g, &Correspondence::identity(2), 0.0).unwrap();

    assert_eq!(
        path.edit_operations,
        vec![
            EditOp::Match {
                graph1_node: 0,
                graph2_node: 0,
                label: "color=red;".into()
            },
            EditOp::Match {
                graph1_node: 1,
                graph2_node: 1,
                label: "color=blue;".into()
            },
            EditOp::MatchEdge {
                graph1_edge: [0, 1],
                graph2_edge: [0, 1],
                label: "weight=1;".into()
            },
        ]
    );
    assert_eq!(path.node_matches, 2);
    assert_eq!(path.edge_matches, 1);
    assert_eq!(path.edit_cost(), 0);
}

#[test]
fn unmatched_node_deleted_before_insertion() {
    setup_test_logging();
    let source = colored_graph(&["red", "blue"], &[]);
    let target = colored_graph(&["yellow", "green"], &[]);
    let path = extract_edit_path(&source, &target, &node_map(&[None, Some(0)]), 3.0).unwrap();

    assert_eq!(
        path.edit_operations,
        vec![
            EditOp::Delete {
                graph1_node: 0,
                graph1_label: "color=red;".into()
            },
            EditOp::Substitute {
                graph1_node: 1,
                graph2_node: 0,
                graph1_label: "color=blue;".into(),
                graph2_label: "color=yellow;".into()
            },
            EditOp::Insert {
                graph2_node: 1,
                graph2_label: "color=green;".into()
            },
        ]
    );
    assert_eq!(path.node_matches, 0);
    assert_eq!(path.edge_matches, 0);
}

#[test]
fn relabeled_edge_is_substituted() {
    setup_test_logging();
    let source = colored_graph(&["red", "blue"], &[(0, 1, "1")]);
    let target = colored_graph(&["red", "blue"], &[(0, 1, "2")]);
    let path = extract_edit_path(&source, &target, &Correspondence::identity(2), 1.0).unwrap();

    let edge_ops: Vec<_> = path
        .edit_operations
        .iter()
        .filter(|op| !op.kind().is_node_op())
        .cloned()
        .collect();
    assert_eq!(
        edge_ops,
        vec![EditOp::SubstituteEdge {
            graph1_edge: [0, 1],
            graph2_edge: [0, 1],
            graph1_label: "weight=1;".into(),
            graph2_label: "weight=2;".into()
        }]
    );
    assert_eq!(path.edge_matches, 0);
}

#[test]
fn deleted_node_edges_are_cleared_silently() {
    setup_test_logging();
    let source = colored_graph(&["a", "b", "c"], &[(0, 1, ""), (1, 2, "")]);
    let target = colored_graph(&["a", "c"], &[(0, 1, "")]);
    let path = extract_edit_path(&source, &target, &node_map(&[Some(0), None, Some(1)]), 2.0)
        .unwrap();

    assert_eq!(path.count(OpKind::Delete), 1);
    assert!(
        path.edit_operations
            .iter()
            .filter_map(EditOp::graph1_edge)
            .all(|[a, b]| a != 1 && b != 1)
    );
    assert_eq!(
        path.edit_operations.last(),
        Some(&EditOp::InsertEdge { graph2_edge: [0, 1] })
    );
    verify(&path, &source, &target).unwrap();
}

#[test]
fn edge_missing_in_target_is_deleted() {
    let source = colored_graph(&["a", "b"], &[(0, 1, "")]);
    let target = colored_graph(&["a", "b"], &[]);
    let path = extract_edit_path(&source, &target, &Correspondence::identity(2), 1.0).unwrap();

    assert_eq!(
        path.edit_operations.last(),
        Some(&EditOp::DeleteEdge {
            graph1_edge: [0, 1],
            note: None
        })
    );
    assert!(path.edit_operations.iter().all(|op| {
        !matches!(op, EditOp::DeleteEdge { note: Some(n), .. } if n == ENDPOINT_DELETED_NOTE)
    }));
}

#[test]
fn inserted_node_gets_its_edges() {
    let source = colored_graph(&["a"], &[]);
    let target = colored_graph(&["a", "b"], &[(0, 1, "7")]);
    let path = extract_edit_path(&source, &target, &Correspondence::identity(1), 2.0).unwrap();

    let kinds: Vec<OpKind> = path.edit_operations.iter().map(EditOp::kind).collect();
    assert_eq!(kinds, vec![OpKind::Match, OpKind::Insert, OpKind::InsertEdge]);
    verify(&path, &source, &target).unwrap();
}

#[test]
fn mapped_endpoints_keep_source_order() {
    let source = colored_graph(&["a", "b"], &[(0, 1, "")]);
    let target = colored_graph(&["b", "a"], &[(0, 1, "")]);
    let path = extract_edit_path(&source, &target, &node_map(&[Some(1), Some(0)]), 0.0).unwrap();

    assert_eq!(
        path.edit_operations.last(),
        Some(&EditOp::MatchEdge {
            graph1_edge: [0, 1],
            graph2_edge: [1, 0],
            label: String::new()
        })
    );
    assert_eq!(path.node_matches, 2);
}

#[test]
fn missing_attributes_encode_empty() {
    let mut source = AttributedGraph::new();
    source.add_node(Default::default());
    let target = colored_graph(&[""], &[]);
    let path = extract_edit_path(&source, &target, &Correspondence::identity(1), 0.0).unwrap();

    assert_eq!(
        path.edit_operations,
        vec![EditOp::Match {
            graph1_node: 0,
            graph2_node: 0,
            label: String::new()
        }]
    );
}

#[test]
fn inserts_never_reuse_deleted_indices() {
    let source = colored_graph(&["a", "b"], &[]);
    let target = colored_graph(&["c", "d"], &[(0, 1, "")]);
    let correspondence = Correspondence::new();
    let extractor = EditPathExtractor::new(&source, &target, &correspondence).unwrap();
    let (path, snapshot) = extractor.extract_with_snapshot(4.0);

    assert_eq!(snapshot.len(), 4);
    assert_eq!(snapshot.node_for_target(0), Some(2));
    assert_eq!(snapshot.node_for_target(1), Some(3));
    assert_eq!(snapshot.origin(3), Some(NodeOrigin::Inserted(1)));
    assert!(!snapshot.is_active(0));
    assert!(snapshot.has_edge(2, 3));
    assert_eq!(path.count(OpKind::Delete), 2);
    assert_eq!(path.count(OpKind::Insert), 2);
    assert_eq!(path.count(OpKind::InsertEdge), 1);
}

#[test]
fn empty_graphs_give_empty_path() {
    let g = AttributedGraph::new();
    let path = extract_edit_path(&g, &g, &Correspondence::new(), 0.0).unwrap();
    assert!(path.is_empty());
    assert_eq!(path.edit_operations_count, 0);
}

#[test]
fn distance_is_passed_through() {
    let g = colored_graph(&["a"], &[]);
    let path = extract_edit_path(&g, &g, &Correspondence::identity(1), 17.25).unwrap();
    let value = serde_json::to_value(&path).unwrap();

    assert_eq!(value["graph_edit_distance"], serde_json::json!(17.25));
    assert_eq!(value["edit_operations_count"], serde_json::json!(1));
    assert_eq!(value["edit_operations"][0]["op"], serde_json::json!("match"));
}

#[rstest]
#[case(&[Some(0), Some(2)], ExtractError::target_out_of_range(1, 2, 2))]
#[case(&[Some(0), None, None], ExtractError::undefined_source(2, 2))]
fn invalid_correspondence_is_rejected(
    #[case] entries: &[Option<usize>],
    #[case] expected: ExtractError,
) {
    let g = colored_graph(&["a", "b"], &[]);
    let result = extract_edit_path(&g, &g, &node_map(entries), 0.0);
    assert_eq!(result.unwrap_err(), expected);
}

#[test]
fn extraction_does_not_touch_inputs() {
    let source = colored_graph(&["a", "b", "c"], &[(0, 1, "1"), (1, 2, "2")]);
    let target = colored_graph(&["c", "a"], &[(0, 1, "3")]);
    let correspondence = node_map(&[Some(1), None, Some(0)]);
    let (source_before, target_before) = (source.clone(), target.clone());

    let first = extract_edit_path(&source, &target, &correspondence, 1.0).unwrap();
    let second = extract_edit_path(&source, &target, &correspondence, 1.0).unwrap();

    assert_eq!(first, second);
    assert_eq!(source, source_before);
    assert_eq!(target, target_before);
}
