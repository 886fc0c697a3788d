use gedpath_common::canonical_label;
use tracing::trace;

use crate::correspondence::NodeAssignment;
use crate::extractor::EditPathExtractor;
use crate::ops::EditOp;
use crate::path::EditScript;
use crate::snapshot::Snapshot;

impl EditPathExtractor<'_> {
    /// Decide every source node, then insert the target nodes nobody matched.
    ///
    /// Deleting a node silently drops its incident edges from the snapshot, so
    /// the edge passes never see them.
    pub(crate) fn node_pass(&self, snapshot: &mut Snapshot, script: &mut EditScript) {
        for i in 0..self.source.num_nodes() {
            if !snapshot.is_active(i) {
                continue;
            }
            let current = snapshot.label(i).unwrap_or_default().to_owned();

            match self.correspondence.get(i) {
                NodeAssignment::Matched(t) => {
                    snapshot.bind_target(t, i);
                    let target_label = canonical_label(self.target.node_label(t));
                    if current == target_label {
                        script.push(EditOp::Match {
                            graph1_node: i,
                            graph2_node: t,
                            label: current,
                        });
                    } else {
                        snapshot.relabel(i, target_label.clone());
                        script.push(EditOp::Substitute {
                            graph1_node: i,
                            graph2_node: t,
                            graph1_label: current,
                            graph2_label: target_label,
                        });
                    }
                }
                NodeAssignment::Unmatched => {
                    snapshot.deactivate(i);
                    script.push(EditOp::Delete {
                        graph1_node: i,
                        graph1_label: current,
                    });
                }
            }
        }

        for j in 0..self.target.num_nodes() {
            if self.correspondence.is_in_image(j) {
                continue;
            }
            let label = canonical_label(self.target.node_label(j));
            let node = snapshot.append(label.clone(), j);
            trace!("target node {} inserted as working node {}", j, node);
            script.push(EditOp::Insert {
                graph2_node: j,
                graph2_label: label,
            });
        }
    }
}
