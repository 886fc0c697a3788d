//! The edit path record returned by extraction.

use serde::{Deserialize, Serialize};

use crate::ops::{EditOp, OpKind};

/// Ordered edit operations plus the summary counters callers persist as JSON.
///
/// `edit_operations_count` always equals the number of operations,
/// `node_matches` the number of `match` operations and `edge_matches` the
/// number of `match_edge` operations. `graph_edit_distance` is copied from the
/// caller and never recomputed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditPath {
    /// Operations in application order
    pub edit_operations: Vec<EditOp>,
    /// Length of `edit_operations`
    pub edit_operations_count: usize,
    /// Distance bound reported by the GED method
    pub graph_edit_distance: f64,
    /// Number of `match` operations
    pub node_matches: usize,
    /// Number of `match_edge` operations
    pub edge_matches: usize,
}

impl EditPath {
    /// Number of operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edit_operations.len()
    }

    /// Returns true for an empty path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edit_operations.is_empty()
    }

    /// Number of operations of the given kind.
    #[must_use]
    pub fn count(&self, kind: OpKind) -> usize {
        self.edit_operations
            .iter()
            .filter(|op| op.kind() == kind)
            .count()
    }

    /// Unit-cost size of the path: every operation that is not a match.
    #[must_use]
    pub fn edit_cost(&self) -> usize {
        self.edit_operations
            .iter()
            .filter(|op| !op.kind().is_match())
            .count()
    }

    /// Returns true if the stored counters agree with the operation list.
    #[must_use]
    pub fn counters_consistent(&self) -> bool {
        self.edit_operations_count == self.len()
            && self.node_matches == self.count(OpKind::Match)
            && self.edge_matches == self.count(OpKind::MatchEdge)
    }

    /// Serialize as a JSON document.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Accumulates operations while the passes run, keeping the counters in step.
#[derive(Debug, Default)]
pub(crate) struct EditScript {
    operations: Vec<EditOp>,
    node_matches: usize,
    edge_matches: usize,
}

impl EditScript {
    pub(crate) fn push(&mut self, op: EditOp) {
        match op.kind() {
            OpKind::Match => self.node_matches += 1,
            OpKind::MatchEdge => self.edge_matches += 1,
            _ => {}
        }
        self.operations.push(op);
    }

    #[contracts::debug_ensures(ret.counters_consistent())]
    pub(crate) fn finish(self, graph_edit_distance: f64) -> EditPath {
        EditPath {
            edit_operations_count: self.operations.len(),
            edit_operations: self.operations,
            graph_edit_distance,
            node_matches: self.node_matches,
            edge_matches: self.edge_matches,
        }
    }
}
