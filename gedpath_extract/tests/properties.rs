mod common;

use common::single;
use gedpath_common::AttributedGraph;
use gedpath_extract::{Correspondence, EditOp, EditPath, OpKind, extract_edit_path, verify};
use quickcheck::{Arbitrary, Gen, quickcheck};

const MAX_NODES: usize = 7;

fn arbitrary_graph(g: &mut Gen) -> AttributedGraph {
    let colors = ["", "red", "blue"];
    let weights = ["", "1", "2"];
    let n = usize::arbitrary(g) % MAX_NODES;

    let mut graph = AttributedGraph::new();
    for _ in 0..n {
        graph.add_node(single("color", g.choose(&colors).copied().unwrap_or_default()));
    }
    for a in 0..n {
        for b in a + 1..n {
            if u8::arbitrary(g) % 3 == 0 {
                let weight = g.choose(&weights).copied().unwrap_or_default();
                graph.add_edge(a, b, single("weight", weight)).unwrap();
            }
        }
    }
    graph
}

/// Two graphs and an injective partial correspondence between them.
#[derive(Clone, Debug)]
struct ArbitraryInstance {
    source: AttributedGraph,
    target: AttributedGraph,
    correspondence: Correspondence,
}

impl Arbitrary for ArbitraryInstance {
    fn arbitrary(g: &mut Gen) -> Self {
        let source = arbitrary_graph(g);
        let target = arbitrary_graph(g);

        let mut free: Vec<usize> = (0..target.num_nodes()).collect();
        let mut node_map = Vec::with_capacity(source.num_nodes());
        for _ in 0..source.num_nodes() {
            if free.is_empty() || u8::arbitrary(g) % 4 == 0 {
                node_map.push(None);
            } else {
                let pick = usize::arbitrary(g) % free.len();
                node_map.push(Some(free.swap_remove(pick)));
            }
        }
        // Trailing unmatched entries may be left out entirely.
        if bool::arbitrary(g) {
            while node_map.last() == Some(&None) {
                node_map.pop();
            }
        }

        Self {
            correspondence: Correspondence::from_node_map(&node_map).unwrap(),
            source,
            target,
        }
    }
}

impl ArbitraryInstance {
    fn extract(&self) -> EditPath {
        extract_edit_path(&self.source, &self.target, &self.correspondence, 0.0).unwrap()
    }

    /// Same instance with both graphs identical and every node matched to itself.
    fn identical(&self) -> Self {
        Self {
            target: self.source.clone(),
            correspondence: Correspondence::identity(self.source.num_nodes()),
            source: self.source.clone(),
        }
    }
}

fn node_op_position(op: &EditOp, num_source: usize) -> usize {
    match op {
        EditOp::Insert { graph2_node, .. } => num_source + graph2_node,
        _ => op.graph1_node().unwrap_or(usize::MAX),
    }
}

quickcheck! {
    fn prop_replay_reaches_target(instance: ArbitraryInstance) -> bool {
        let path = instance.extract();
        verify(&path, &instance.source, &instance.target).is_ok()
    }

    fn prop_every_node_covered_once(instance: ArbitraryInstance) -> bool {
        let path = instance.extract();
        let source_ok = (0..instance.source.num_nodes()).all(|i| {
            path.edit_operations.iter().filter(|op| op.graph1_node() == Some(i)).count() == 1
        });
        let insert_ok = (0..instance.target.num_nodes()).all(|j| {
            let inserts = path
                .edit_operations
                .iter()
                .filter(|op| matches!(op, EditOp::Insert { graph2_node, .. } if *graph2_node == j))
                .count();
            inserts == usize::from(!instance.correspondence.is_in_image(j))
        });
        source_ok && insert_ok
    }

    fn prop_counters_match_operations(instance: ArbitraryInstance) -> bool {
        let path = instance.extract();
        path.edit_operations_count == path.edit_operations.len()
            && path.node_matches == path.count(OpKind::Match)
            && path.edge_matches == path.count(OpKind::MatchEdge)
    }

    fn prop_deleted_nodes_have_no_edge_ops(instance: ArbitraryInstance) -> bool {
        let path = instance.extract();
        let deleted: Vec<usize> = path
            .edit_operations
            .iter()
            .filter(|op| op.kind() == OpKind::Delete)
            .filter_map(EditOp::graph1_node)
            .collect();
        path.edit_operations
            .iter()
            .filter_map(EditOp::graph1_edge)
            .all(|[a, b]| !deleted.contains(&a) && !deleted.contains(&b))
    }

    fn prop_operations_are_ordered(instance: ArbitraryInstance) -> bool {
        let path = instance.extract();
        let num_source = instance.source.num_nodes();
        let kinds: Vec<OpKind> = path.edit_operations.iter().map(EditOp::kind).collect();

        let node_ops = kinds.iter().take_while(|k| k.is_node_op()).count();
        let source_edge_ops = kinds[node_ops..]
            .iter()
            .take_while(|k| **k != OpKind::InsertEdge)
            .count();
        let phases_ok = kinds[node_ops..].iter().all(|k| !k.is_node_op())
            && kinds[node_ops + source_edge_ops..].iter().all(|k| *k == OpKind::InsertEdge);

        let node_positions: Vec<usize> = path.edit_operations[..node_ops]
            .iter()
            .map(|op| node_op_position(op, num_source))
            .collect();
        let source_edge_range = node_ops..node_ops + source_edge_ops;
        let edge_positions: Vec<[usize; 2]> = path.edit_operations[source_edge_range]
            .iter()
            .filter_map(EditOp::graph1_edge)
            .collect();

        phases_ok
            && node_positions.is_sorted()
            && edge_positions.len() == source_edge_ops
            && edge_positions.is_sorted()
    }

    fn prop_identical_graphs_only_match(instance: ArbitraryInstance) -> bool {
        let same = instance.identical();
        let path = same.extract();
        path.edit_cost() == 0
            && path.node_matches == same.source.num_nodes()
            && path.edge_matches == same.source.num_edges()
    }
}
