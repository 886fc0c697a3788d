//! Mutable working copy of graph 1 that edit operations are applied to.
//!
//! Nodes live in an arena: the first `source_len()` slots are the source
//! nodes, inserted nodes are appended after them. Deleted nodes stay in the
//! arena, flagged inactive, so indices never shift. Edges are a sparse map
//! keyed by arena indices.

use std::collections::BTreeMap;

use contracts::*;
use gedpath_common::{AttributedGraph, EdgeKey, canonical_label};
use tracing::trace;

/// Where an arena node came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeOrigin {
    /// Copied from this node of graph 1.
    Source(usize),
    /// Inserted for this node of graph 2.
    Inserted(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ArenaNode {
    active: bool,
    label: String,
    origin: NodeOrigin,
    /// Graph 2 node this arena node stands for, once known
    target: Option<usize>,
}

/// Arena of nodes plus a sparse edge map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    nodes: Vec<ArenaNode>,
    edges: BTreeMap<EdgeKey, String>,
    bindings: BTreeMap<usize, usize>,
    source_len: usize,
}

impl Snapshot {
    /// Copy graph 1: every node active with its canonical label, every edge present.
    #[must_use]
    pub fn from_graph(graph: &AttributedGraph) -> Self {
        let nodes = (0..graph.num_nodes())
            .map(|i| ArenaNode {
                active: true,
                label: canonical_label(graph.node_label(i)),
                origin: NodeOrigin::Source(i),
                target: None,
            })
            .collect();
        let edges = graph
            .edges()
            .map(|(key, attrs)| (key, canonical_label(Some(attrs))))
            .collect();
        Self {
            nodes,
            edges,
            bindings: BTreeMap::new(),
            source_len: graph.num_nodes(),
        }
    }

    /// Number of arena slots, active or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of slots copied from graph 1.
    #[must_use]
    pub const fn source_len(&self) -> usize {
        self.source_len
    }

    /// Returns false for deleted nodes and for indices outside the arena.
    #[must_use]
    pub fn is_active(&self, node: usize) -> bool {
        self.nodes.get(node).is_some_and(|n| n.active)
    }

    /// Current label of a node (deleted nodes keep their last label).
    #[must_use]
    pub fn label(&self, node: usize) -> Option<&str> {
        self.nodes.get(node).map(|n| n.label.as_str())
    }

    /// Where an arena node came from.
    #[must_use]
    pub fn origin(&self, node: usize) -> Option<NodeOrigin> {
        self.nodes.get(node).map(|n| n.origin)
    }

    /// Number of active nodes.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.active).count()
    }

    /// Indices of the active nodes, ascending.
    pub fn active_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.active)
            .map(|(i, _)| i)
    }

    /// Replace the label of an active node.
    #[debug_requires(self.is_active(node))]
    pub fn relabel(&mut self, node: usize, label: String) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.label = label;
        }
    }

    /// Delete a node together with every edge incident to it.
    ///
    /// Returns the number of edges removed by the cascade.
    #[debug_requires(self.is_active(node))]
    #[debug_ensures(!self.is_active(node))]
    #[debug_ensures(self.edges.keys().all(|k| !k.touches(node)))]
    pub fn deactivate(&mut self, node: usize) -> usize {
        if let Some(n) = self.nodes.get_mut(node) {
            n.active = false;
        }
        let before = self.edges.len();
        self.edges.retain(|key, _| !key.touches(node));
        let removed = before - self.edges.len();
        if removed > 0 {
            trace!("node {} deleted, dropping {} incident edges", node, removed);
        }
        removed
    }

    /// Append an active node standing for graph 2 node `target` and bind it.
    #[debug_requires(self.node_for_target(target).is_none())]
    #[debug_ensures(ret + 1 == self.len())]
    pub fn append(&mut self, label: String, target: usize) -> usize {
        let node = self.nodes.len();
        self.nodes.push(ArenaNode {
            active: true,
            label,
            origin: NodeOrigin::Inserted(target),
            target: Some(target),
        });
        self.bindings.insert(target, node);
        node
    }

    /// Record that arena node `node` stands for graph 2 node `target`.
    #[debug_requires(node < self.len())]
    #[debug_requires(self.node_for_target(target).is_none_or(|n| n == node))]
    pub fn bind_target(&mut self, target: usize, node: usize) {
        if let Some(n) = self.nodes.get_mut(node) {
            if let Some(old) = n.target.replace(target) {
                self.bindings.remove(&old);
            }
            self.bindings.insert(target, node);
        }
    }

    /// Arena node bound to graph 2 node `target`.
    #[must_use]
    pub fn node_for_target(&self, target: usize) -> Option<usize> {
        self.bindings.get(&target).copied()
    }

    /// Graph 2 node an arena node is bound to.
    #[must_use]
    pub fn target_of(&self, node: usize) -> Option<usize> {
        self.nodes.get(node).and_then(|n| n.target)
    }

    /// Returns true if `a` and `b` are adjacent.
    #[must_use]
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        a != b && self.edges.contains_key(&EdgeKey::new(a, b))
    }

    /// Label of the edge between `a` and `b`, `None` if absent.
    #[must_use]
    pub fn edge_label(&self, a: usize, b: usize) -> Option<&str> {
        if a == b {
            return None;
        }
        self.edges.get(&EdgeKey::new(a, b)).map(String::as_str)
    }

    /// Insert an edge or replace its label. Both endpoints must be active.
    #[debug_requires(self.is_active(a) && self.is_active(b) && a != b)]
    pub fn set_edge(&mut self, a: usize, b: usize, label: String) {
        self.edges.insert(EdgeKey::new(a, b), label);
    }

    /// Remove an edge, returning its label if it was present.
    pub fn remove_edge(&mut self, a: usize, b: usize) -> Option<String> {
        if a == b {
            return None;
        }
        self.edges.remove(&EdgeKey::new(a, b))
    }

    /// Number of edges currently present.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Present edges in ascending arena order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, &str)> + '_ {
        self.edges.iter().map(|(k, v)| (*k, v.as_str()))
    }
}
