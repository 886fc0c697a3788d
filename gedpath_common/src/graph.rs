//! Immutable attributed graphs handed to the edit path extractor.
//!
//! Graphs are undirected and simple: an edge is stored once under its
//! normalized [`EdgeKey`] and self loops are rejected. Nodes and edges carry an
//! [`AttrMap`]; an ordered map, so iteration over attributes is always sorted by
//! key regardless of how the attributes were inserted.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

/// Attribute key to attribute value mapping of a node or an edge.
pub type AttrMap = BTreeMap<String, String>;

/// Errors raised while building an [`AttributedGraph`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An edge endpoint does not name an existing node.
    #[error("node {node} is out of range for a graph with {num_nodes} nodes")]
    NodeOutOfRange { node: usize, num_nodes: usize },

    /// Both endpoints of an edge are the same node.
    #[error("self loop on node {0} is not supported")]
    SelfLoop(usize),
}

/// Undirected edge identifier, always stored with `lo < hi`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    lo: usize,
    hi: usize,
}

impl EdgeKey {
    /// Normalize an unordered pair of endpoints.
    #[contracts::debug_requires(a != b)]
    #[must_use]
    pub fn new(a: usize, b: usize) -> Self {
        if a < b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// Smaller endpoint.
    #[must_use]
    pub const fn lo(&self) -> usize {
        self.lo
    }

    /// Larger endpoint.
    #[must_use]
    pub const fn hi(&self) -> usize {
        self.hi
    }

    /// Returns true if `node` is one of the endpoints.
    #[must_use]
    pub const fn touches(&self, node: usize) -> bool {
        self.lo == node || self.hi == node
    }

    /// Endpoints as a two element array, in normalized order.
    #[must_use]
    pub const fn as_array(&self) -> [usize; 2] {
        [self.lo, self.hi]
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lo, self.hi)
    }
}

/// A labeled, undirected graph with nodes indexed `0..num_nodes()`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributedGraph {
    node_labels: Vec<AttrMap>,
    edges: BTreeMap<EdgeKey, AttrMap>,
}

impl AttributedGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph with one node per attribute map and no edges.
    #[must_use]
    pub fn with_nodes(node_labels: Vec<AttrMap>) -> Self {
        Self {
            node_labels,
            edges: BTreeMap::new(),
        }
    }

    /// Appends a node and returns its index.
    #[contracts::debug_ensures(ret + 1 == self.num_nodes())]
    pub fn add_node(&mut self, attrs: AttrMap) -> usize {
        self.node_labels.push(attrs);
        self.node_labels.len() - 1
    }

    /// Adds (or relabels) the undirected edge between `a` and `b`.
    pub fn add_edge(&mut self, a: usize, b: usize, attrs: AttrMap) -> Result<EdgeKey, GraphError> {
        let num_nodes = self.num_nodes();
        for node in [a, b] {
            if node >= num_nodes {
                return Err(GraphError::NodeOutOfRange { node, num_nodes });
            }
        }
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }

        let key = EdgeKey::new(a, b);
        if self.edges.insert(key, attrs).is_some() {
            trace!("edge {} given twice, keeping the last attributes", key);
        }
        Ok(key)
    }

    /// Number of nodes.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.node_labels.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Attributes of node `i`, `None` if the node does not exist.
    #[must_use]
    pub fn node_label(&self, i: usize) -> Option<&AttrMap> {
        self.node_labels.get(i)
    }

    /// Returns true if `i` and `j` are adjacent. Order of the endpoints is irrelevant.
    #[must_use]
    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        i != j && self.edges.contains_key(&EdgeKey::new(i, j))
    }

    /// Attributes of the edge between `i` and `j`, `None` if they are not adjacent.
    #[must_use]
    pub fn edge_label(&self, i: usize, j: usize) -> Option<&AttrMap> {
        if i == j {
            return None;
        }
        self.edges.get(&EdgeKey::new(i, j))
    }

    /// Edges in ascending `(lo, hi)` order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, &AttrMap)> + '_ {
        self.edges.iter().map(|(k, v)| (*k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> AttrMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn edge_key_is_normalized() {
        let k = EdgeKey::new(5, 2);
        assert_eq!(k.lo(), 2);
        assert_eq!(k.hi(), 5);
        assert_eq!(k, EdgeKey::new(2, 5));
        assert!(k.touches(5));
        assert!(!k.touches(3));
    }

    #[test]
    fn edges_are_undirected() {
        let mut g = AttributedGraph::with_nodes(vec![AttrMap::new(); 3]);
        g.add_edge(2, 0, attrs(&[("weight", "1")])).unwrap();

        assert!(g.has_edge(0, 2));
        assert!(g.has_edge(2, 0));
        assert!(!g.has_edge(0, 1));
        assert_eq!(g.edge_label(0, 2), Some(&attrs(&[("weight", "1")])));
        assert_eq!(g.num_edges(), 1);
    }

    #[test]
    fn add_edge_rejects_bad_endpoints() {
        let mut g = AttributedGraph::with_nodes(vec![AttrMap::new(); 2]);

        assert_eq!(
            g.add_edge(0, 2, AttrMap::new()),
            Err(GraphError::NodeOutOfRange { node: 2, num_nodes: 2 })
        );
        assert_eq!(g.add_edge(1, 1, AttrMap::new()), Err(GraphError::SelfLoop(1)));
        assert_eq!(g.num_edges(), 0);
    }

    #[test]
    fn missing_node_has_no_label() {
        let mut g = AttributedGraph::new();
        let n = g.add_node(attrs(&[("color", "red")]));
        assert_eq!(n, 0);
        assert!(g.node_label(0).is_some());
        assert!(g.node_label(1).is_none());
    }

    #[test]
    fn edges_iterate_in_sorted_order() {
        let mut g = AttributedGraph::with_nodes(vec![AttrMap::new(); 4]);
        g.add_edge(3, 2, AttrMap::new()).unwrap();
        g.add_edge(0, 3, AttrMap::new()).unwrap();
        g.add_edge(1, 0, AttrMap::new()).unwrap();

        let keys: Vec<[usize; 2]> = g.edges().map(|(k, _)| k.as_array()).collect();
        assert_eq!(keys, vec![[0, 1], [0, 3], [2, 3]]);
    }
}
