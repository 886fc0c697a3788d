use gedpath_common::AttributedGraph;
use tracing::debug;

use crate::correspondence::Correspondence;
use crate::error::ExtractError;
use crate::path::{EditPath, EditScript};
use crate::snapshot::Snapshot;

/// Turns a validated node correspondence into an explicit edit path.
///
/// The path is produced in three passes over a [`Snapshot`] of graph 1:
/// nodes (source nodes ascending, then inserted target nodes ascending), edges
/// of graph 1 in ascending `(lo, hi)` order, then edges of graph 2 in the
/// same order. The graphs and the correspondence are only read.
#[derive(Clone, Copy, Debug)]
pub struct EditPathExtractor<'a> {
    pub(crate) source: &'a AttributedGraph,
    pub(crate) target: &'a AttributedGraph,
    pub(crate) correspondence: &'a Correspondence,
}

impl<'a> EditPathExtractor<'a> {
    /// Check the correspondence against both graphs.
    pub fn new(
        source: &'a AttributedGraph,
        target: &'a AttributedGraph,
        correspondence: &'a Correspondence,
    ) -> Result<Self, ExtractError> {
        correspondence.validate(source.num_nodes(), target.num_nodes())?;
        Ok(Self {
            source,
            target,
            correspondence,
        })
    }

    /// Run the three passes. `graph_edit_distance` is recorded verbatim.
    #[must_use]
    pub fn extract(&self, graph_edit_distance: f64) -> EditPath {
        self.extract_with_snapshot(graph_edit_distance).0
    }

    /// Like [`extract`](Self::extract), also returning the final working graph.
    #[must_use]
    pub fn extract_with_snapshot(&self, graph_edit_distance: f64) -> (EditPath, Snapshot) {
        debug!(
            "extracting edit path: {} nodes / {} edges -> {} nodes / {} edges, {} matched",
            self.source.num_nodes(),
            self.source.num_edges(),
            self.target.num_nodes(),
            self.target.num_edges(),
            self.correspondence.matched_len()
        );

        let mut snapshot = Snapshot::from_graph(self.source);
        let mut script = EditScript::default();

        self.node_pass(&mut snapshot, &mut script);
        self.source_edge_pass(&mut snapshot, &mut script);
        self.target_edge_pass(&mut snapshot, &mut script);

        let path = script.finish(graph_edit_distance);
        debug!(
            "edit path has {} operations ({} node matches, {} edge matches, cost {})",
            path.edit_operations_count,
            path.node_matches,
            path.edge_matches,
            path.edit_cost()
        );
        (path, snapshot)
    }
}

/// Validate the inputs and extract the edit path in one call.
pub fn extract_edit_path(
    source: &AttributedGraph,
    target: &AttributedGraph,
    correspondence: &Correspondence,
    graph_edit_distance: f64,
) -> Result<EditPath, ExtractError> {
    Ok(EditPathExtractor::new(source, target, correspondence)?.extract(graph_edit_distance))
}
