//! Replaying an edit path against graph 1 and checking that it yields graph 2.
//!
//! Replay is strict: every operation must describe the working graph as it is
//! when the operation is applied (labels, presence of nodes and edges) and
//! graph 2 indices must be bound consistently. Verification then requires the
//! replayed graph to equal graph 2 under those bindings and the stored counters
//! to agree with the operations.

use gedpath_common::{AttributedGraph, EdgeKey, canonical_label};
use thiserror::Error;
use tracing::debug;

use crate::ops::{EditOp, OpKind};
use crate::path::EditPath;
use crate::snapshot::Snapshot;

/// Why an edit path failed to replay or verify.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// A graph 1 node is deleted or was never there.
    #[error("operation {index} ({op}) references node {node}, which is not present")]
    MissingNode {
        index: usize,
        op: OpKind,
        node: usize,
    },

    /// A node operation records a stale label.
    #[error("operation {index} ({op}) expects label '{expected}' on node {node}, found '{found}'")]
    NodeLabelMismatch {
        index: usize,
        op: OpKind,
        node: usize,
        expected: String,
        found: String,
    },

    /// An edge operation names an edge the working graph lacks.
    #[error("operation {index} ({op}) references edge {edge}, which is not present")]
    MissingEdge {
        index: usize,
        op: OpKind,
        edge: EdgeKey,
    },

    /// An edge operation records a stale label.
    #[error("operation {index} ({op}) expects label '{expected}' on edge {edge}, found '{found}'")]
    EdgeLabelMismatch {
        index: usize,
        op: OpKind,
        edge: EdgeKey,
        expected: String,
        found: String,
    },

    /// A graph 2 node index is out of range.
    #[error("operation {index} ({op}) names graph 2 node {node}, which graph 2 does not have")]
    UnknownTargetNode {
        index: usize,
        op: OpKind,
        node: usize,
    },

    /// A graph 2 edge does not exist.
    #[error("operation {index} ({op}) names graph 2 edge {edge:?}, which graph 2 does not have")]
    UnknownTargetEdge {
        index: usize,
        op: OpKind,
        edge: [usize; 2],
    },

    /// Two working nodes claim the same graph 2 node.
    #[error("operation {index} ({op}) binds graph 2 node {node} a second time")]
    TargetBoundTwice {
        index: usize,
        op: OpKind,
        node: usize,
    },

    /// An inserted edge names a graph 2 node nothing stands for.
    #[error("operation {index} ({op}) names graph 2 node {node} before anything is bound to it")]
    UnboundTarget {
        index: usize,
        op: OpKind,
        node: usize,
    },

    /// An edge is paired with a graph 2 edge between other nodes.
    #[error("operation {index} ({op}): edge {graph1_edge} is not bound to {graph2_edge:?}")]
    EdgeBindingMismatch {
        index: usize,
        op: OpKind,
        graph1_edge: EdgeKey,
        graph2_edge: [usize; 2],
    },

    /// An inserted edge is already present.
    #[error("operation {index} inserts edge {edge}, which is already present")]
    DuplicateEdge { index: usize, edge: EdgeKey },

    /// Replay ends with the wrong number of nodes.
    #[error("replayed graph has {found} nodes, graph 2 has {expected}")]
    NodeCountMismatch { expected: usize, found: usize },

    /// A graph 2 node has no live working node.
    #[error("graph 2 node {node} is never produced by the edit path")]
    TargetNotProduced { node: usize },

    /// A working node ends with the wrong label.
    #[error("graph 2 node {node} has label '{expected}', the replayed node has '{found}'")]
    TargetLabelMismatch {
        node: usize,
        expected: String,
        found: String,
    },

    /// A live working node stands for no graph 2 node.
    #[error("replayed node {node} does not stand for any graph 2 node")]
    UnboundNode { node: usize },

    /// The replayed graph has an edge graph 2 lacks.
    #[error("replayed edge {edge} (graph 2 indices) is not in graph 2")]
    ExtraEdge { edge: EdgeKey },

    /// The replayed graph lacks an edge of graph 2.
    #[error("graph 2 edge {edge} is missing from the replayed graph")]
    MissingTargetEdge { edge: EdgeKey },

    /// A replayed edge ends with the wrong label.
    #[error("graph 2 edge {edge} has label '{expected}', the replayed edge has '{found}'")]
    TargetEdgeLabelMismatch {
        edge: EdgeKey,
        expected: String,
        found: String,
    },

    /// A stored counter disagrees with the operations.
    #[error("{counter} is {recorded}, but the edit path contains {actual}")]
    CounterMismatch {
        counter: &'static str,
        recorded: usize,
        actual: usize,
    },
}

struct Replayer<'a> {
    target: &'a AttributedGraph,
    snapshot: Snapshot,
}

impl Replayer<'_> {
    fn source_node(&self, index: usize, op: OpKind, node: usize) -> Result<(), ReplayError> {
        if node < self.snapshot.source_len() && self.snapshot.is_active(node) {
            Ok(())
        } else {
            Err(ReplayError::MissingNode { index, op, node })
        }
    }

    fn node_label(
        &self,
        index: usize,
        op: OpKind,
        node: usize,
        expected: &str,
    ) -> Result<(), ReplayError> {
        self.source_node(index, op, node)?;
        let found = self.snapshot.label(node).unwrap_or_default();
        if found == expected {
            Ok(())
        } else {
            Err(ReplayError::NodeLabelMismatch {
                index,
                op,
                node,
                expected: expected.to_owned(),
                found: found.to_owned(),
            })
        }
    }

    fn bind(
        &mut self,
        index: usize,
        op: OpKind,
        graph2_node: usize,
        node: usize,
    ) -> Result<(), ReplayError> {
        if graph2_node >= self.target.num_nodes() {
            return Err(ReplayError::UnknownTargetNode {
                index,
                op,
                node: graph2_node,
            });
        }
        if self.snapshot.node_for_target(graph2_node).is_some()
            || self.snapshot.target_of(node).is_some()
        {
            return Err(ReplayError::TargetBoundTwice {
                index,
                op,
                node: graph2_node,
            });
        }
        self.snapshot.bind_target(graph2_node, node);
        Ok(())
    }

    fn edge_label(
        &self,
        index: usize,
        op: OpKind,
        [a, b]: [usize; 2],
        expected: &str,
    ) -> Result<EdgeKey, ReplayError> {
        if a == b {
            return Err(ReplayError::MissingNode { index, op, node: a });
        }
        let edge = EdgeKey::new(a, b);
        let Some(found) = self.snapshot.edge_label(a, b) else {
            return Err(ReplayError::MissingEdge { index, op, edge });
        };
        if found == expected {
            Ok(edge)
        } else {
            Err(ReplayError::EdgeLabelMismatch {
                index,
                op,
                edge,
                expected: expected.to_owned(),
                found: found.to_owned(),
            })
        }
    }

    /// The working edge must be the image of the graph 2 edge under the bindings.
    fn edge_binding(
        &self,
        index: usize,
        op: OpKind,
        graph1_edge: EdgeKey,
        graph2_edge: [usize; 2],
    ) -> Result<(), ReplayError> {
        let [j, k] = graph2_edge;
        if !self.target.has_edge(j, k) {
            return Err(ReplayError::UnknownTargetEdge {
                index,
                op,
                edge: graph2_edge,
            });
        }
        match (self.snapshot.node_for_target(j), self.snapshot.node_for_target(k)) {
            (Some(a), Some(b)) if EdgeKey::new(a, b) == graph1_edge => Ok(()),
            _ => Err(ReplayError::EdgeBindingMismatch {
                index,
                op,
                graph1_edge,
                graph2_edge,
            }),
        }
    }

    fn bound_node(
        &self,
        index: usize,
        op: OpKind,
        graph2_node: usize,
    ) -> Result<usize, ReplayError> {
        let node = self
            .snapshot
            .node_for_target(graph2_node)
            .ok_or(ReplayError::UnboundTarget {
                index,
                op,
                node: graph2_node,
            })?;
        if self.snapshot.is_active(node) {
            Ok(node)
        } else {
            Err(ReplayError::MissingNode { index, op, node })
        }
    }

    fn apply(&mut self, index: usize, op: &EditOp) -> Result<(), ReplayError> {
        let kind = op.kind();
        match op {
            EditOp::Match {
                graph1_node,
                graph2_node,
                label,
            } => {
                self.node_label(index, kind, *graph1_node, label)?;
                self.bind(index, kind, *graph2_node, *graph1_node)?;
            }
            EditOp::Substitute {
                graph1_node,
                graph2_node,
                graph1_label,
                graph2_label,
            } => {
                self.node_label(index, kind, *graph1_node, graph1_label)?;
                self.bind(index, kind, *graph2_node, *graph1_node)?;
                self.snapshot.relabel(*graph1_node, graph2_label.clone());
            }
            EditOp::Delete {
                graph1_node,
                graph1_label,
            } => {
                self.node_label(index, kind, *graph1_node, graph1_label)?;
                self.snapshot.deactivate(*graph1_node);
            }
            EditOp::Insert {
                graph2_node,
                graph2_label,
            } => {
                if *graph2_node >= self.target.num_nodes() {
                    return Err(ReplayError::UnknownTargetNode {
                        index,
                        op: kind,
                        node: *graph2_node,
                    });
                }
                if self.snapshot.node_for_target(*graph2_node).is_some() {
                    return Err(ReplayError::TargetBoundTwice {
                        index,
                        op: kind,
                        node: *graph2_node,
                    });
                }
                self.snapshot.append(graph2_label.clone(), *graph2_node);
            }
            EditOp::MatchEdge {
                graph1_edge,
                graph2_edge,
                label,
            } => {
                let edge = self.edge_label(index, kind, *graph1_edge, label)?;
                self.edge_binding(index, kind, edge, *graph2_edge)?;
            }
            EditOp::SubstituteEdge {
                graph1_edge,
                graph2_edge,
                graph1_label,
                graph2_label,
            } => {
                let edge = self.edge_label(index, kind, *graph1_edge, graph1_label)?;
                self.edge_binding(index, kind, edge, *graph2_edge)?;
                self.snapshot
                    .set_edge(edge.lo(), edge.hi(), graph2_label.clone());
            }
            EditOp::DeleteEdge { graph1_edge, .. } => {
                let [a, b] = *graph1_edge;
                if self.snapshot.remove_edge(a, b).is_none() {
                    if a == b {
                        return Err(ReplayError::MissingNode { index, op: kind, node: a });
                    }
                    return Err(ReplayError::MissingEdge {
                        index,
                        op: kind,
                        edge: EdgeKey::new(a, b),
                    });
                }
            }
            EditOp::InsertEdge { graph2_edge } => {
                let [j, k] = *graph2_edge;
                let Some(attrs) = self.target.edge_label(j, k) else {
                    return Err(ReplayError::UnknownTargetEdge {
                        index,
                        op: kind,
                        edge: *graph2_edge,
                    });
                };
                let a = self.bound_node(index, kind, j)?;
                let b = self.bound_node(index, kind, k)?;
                if self.snapshot.has_edge(a, b) {
                    return Err(ReplayError::DuplicateEdge {
                        index,
                        edge: EdgeKey::new(a, b),
                    });
                }
                self.snapshot.set_edge(a, b, canonical_label(Some(attrs)));
            }
        }
        Ok(())
    }
}

/// Apply the operations of `path` to a fresh copy of `source`.
///
/// Inserted edges take their label from `target`. Returns the final working
/// graph with its graph 2 bindings.
pub fn replay(
    path: &EditPath,
    source: &AttributedGraph,
    target: &AttributedGraph,
) -> Result<Snapshot, ReplayError> {
    let mut replayer = Replayer {
        target,
        snapshot: Snapshot::from_graph(source),
    };
    for (index, op) in path.edit_operations.iter().enumerate() {
        replayer.apply(index, op)?;
    }
    Ok(replayer.snapshot)
}

fn check_counter(counter: &'static str, recorded: usize, actual: usize) -> Result<(), ReplayError> {
    if recorded == actual {
        Ok(())
    } else {
        Err(ReplayError::CounterMismatch {
            counter,
            recorded,
            actual,
        })
    }
}

/// Check that the counters agree with the operations and that replaying the
/// path on `source` yields a graph equal to `target`.
pub fn verify(
    path: &EditPath,
    source: &AttributedGraph,
    target: &AttributedGraph,
) -> Result<(), ReplayError> {
    check_counter("edit_operations_count", path.edit_operations_count, path.len())?;
    check_counter("node_matches", path.node_matches, path.count(OpKind::Match))?;
    check_counter("edge_matches", path.edge_matches, path.count(OpKind::MatchEdge))?;

    let snapshot = replay(path, source, target)?;

    let found = snapshot.active_count();
    if found != target.num_nodes() {
        return Err(ReplayError::NodeCountMismatch {
            expected: target.num_nodes(),
            found,
        });
    }

    for j in 0..target.num_nodes() {
        let node = snapshot
            .node_for_target(j)
            .filter(|&n| snapshot.is_active(n))
            .ok_or(ReplayError::TargetNotProduced { node: j })?;
        let expected = canonical_label(target.node_label(j));
        let found = snapshot.label(node).unwrap_or_default();
        if found != expected {
            return Err(ReplayError::TargetLabelMismatch {
                node: j,
                expected,
                found: found.to_owned(),
            });
        }
    }

    for (key, found) in snapshot.edges() {
        let (j, k) = match (snapshot.target_of(key.lo()), snapshot.target_of(key.hi())) {
            (Some(j), Some(k)) => (j, k),
            (None, _) => return Err(ReplayError::UnboundNode { node: key.lo() }),
            (_, None) => return Err(ReplayError::UnboundNode { node: key.hi() }),
        };
        let edge = EdgeKey::new(j, k);
        let Some(attrs) = target.edge_label(j, k) else {
            return Err(ReplayError::ExtraEdge { edge });
        };
        let expected = canonical_label(Some(attrs));
        if found != expected {
            return Err(ReplayError::TargetEdgeLabelMismatch {
                edge,
                expected,
                found: found.to_owned(),
            });
        }
    }

    for (key, _) in target.edges() {
        let bound = (
            snapshot.node_for_target(key.lo()),
            snapshot.node_for_target(key.hi()),
        );
        let present = match bound {
            (Some(a), Some(b)) => snapshot.has_edge(a, b),
            _ => false,
        };
        if !present {
            return Err(ReplayError::MissingTargetEdge { edge: key });
        }
    }

    debug!("edit path of {} operations verified", path.len());
    Ok(())
}
