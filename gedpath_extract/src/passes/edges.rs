use gedpath_common::canonical_label;
use tracing::trace;

use crate::correspondence::NodeAssignment;
use crate::extractor::EditPathExtractor;
use crate::ops::{ENDPOINT_DELETED_NOTE, EditOp};
use crate::path::EditScript;
use crate::snapshot::Snapshot;

impl EditPathExtractor<'_> {
    /// Reconcile every surviving edge of graph 1 with graph 2.
    pub(crate) fn source_edge_pass(&self, snapshot: &mut Snapshot, script: &mut EditScript) {
        for (key, _) in self.source.edges() {
            let (i, k) = (key.lo(), key.hi());
            if !snapshot.is_active(i) || !snapshot.is_active(k) {
                continue;
            }

            match (self.correspondence.get(i), self.correspondence.get(k)) {
                (NodeAssignment::Matched(mi), NodeAssignment::Matched(mk)) => {
                    if let Some(attrs) = self.target.edge_label(mi, mk) {
                        let current = snapshot.edge_label(i, k).unwrap_or_default().to_owned();
                        let target_label = canonical_label(Some(attrs));
                        if current == target_label {
                            script.push(EditOp::MatchEdge {
                                graph1_edge: [i, k],
                                graph2_edge: [mi, mk],
                                label: current,
                            });
                        } else {
                            snapshot.set_edge(i, k, target_label.clone());
                            script.push(EditOp::SubstituteEdge {
                                graph1_edge: [i, k],
                                graph2_edge: [mi, mk],
                                graph1_label: current,
                                graph2_label: target_label,
                            });
                        }
                    } else if snapshot.remove_edge(i, k).is_some() {
                        script.push(EditOp::DeleteEdge {
                            graph1_edge: [i, k],
                            note: None,
                        });
                    }
                }
                _ => {
                    // Only reached if an unmatched endpoint is still active.
                    if snapshot.remove_edge(i, k).is_some() {
                        script.push(EditOp::DeleteEdge {
                            graph1_edge: [i, k],
                            note: Some(ENDPOINT_DELETED_NOTE.to_owned()),
                        });
                    }
                }
            }
        }
    }

    /// Insert every edge of graph 2 whose endpoints survive but are not yet adjacent.
    pub(crate) fn target_edge_pass(&self, snapshot: &mut Snapshot, script: &mut EditScript) {
        for (key, attrs) in self.target.edges() {
            let (j, k) = (key.lo(), key.hi());
            let (Some(a), Some(b)) = (snapshot.node_for_target(j), snapshot.node_for_target(k))
            else {
                trace!("target edge {} has an unbound endpoint", key);
                continue;
            };
            if !snapshot.is_active(a) || !snapshot.is_active(b) || snapshot.has_edge(a, b) {
                continue;
            }

            snapshot.set_edge(a, b, canonical_label(Some(attrs)));
            script.push(EditOp::InsertEdge { graph2_edge: [j, k] });
        }
    }
}
