//! Edit operations and their JSON form.
//!
//! Every operation is a tagged object whose `op` field names the kind. Node
//! indices prefixed `graph1_` are positions in the working copy of graph 1
//! (source nodes keep their original index), indices prefixed `graph2_` are
//! positions in graph 2. Edge endpoints are serialized as two element arrays.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Note attached to a `delete_edge` emitted because an endpoint is unmatched.
pub const ENDPOINT_DELETED_NOTE: &str = "endpoint deleted";

/// A single step of an edit path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    /// Matched node whose label already agrees with its target.
    Match {
        graph1_node: usize,
        graph2_node: usize,
        label: String,
    },
    /// Matched node relabeled to its target's label.
    Substitute {
        graph1_node: usize,
        graph2_node: usize,
        graph1_label: String,
        graph2_label: String,
    },
    /// Unmatched source node removed (with its incident edges).
    Delete {
        graph1_node: usize,
        graph1_label: String,
    },
    /// Target node with no counterpart, added to the working graph.
    Insert {
        graph2_node: usize,
        graph2_label: String,
    },
    /// Surviving edge whose label already agrees with its graph 2 edge.
    MatchEdge {
        graph1_edge: [usize; 2],
        graph2_edge: [usize; 2],
        label: String,
    },
    /// Surviving edge relabeled to its graph 2 edge's label.
    SubstituteEdge {
        graph1_edge: [usize; 2],
        graph2_edge: [usize; 2],
        graph1_label: String,
        graph2_label: String,
    },
    /// Edge of graph 1 with no counterpart in graph 2.
    DeleteEdge {
        graph1_edge: [usize; 2],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    /// Edge of graph 2 missing from the working graph. Endpoints are graph 2 indices.
    InsertEdge { graph2_edge: [usize; 2] },
}

/// Kind of an [`EditOp`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    /// `match`
    Match,
    /// `substitute`
    Substitute,
    /// `delete`
    Delete,
    /// `insert`
    Insert,
    /// `match_edge`
    MatchEdge,
    /// `substitute_edge`
    SubstituteEdge,
    /// `delete_edge`
    DeleteEdge,
    /// `insert_edge`
    InsertEdge,
}

impl OpKind {
    /// Tag used for the `op` field.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Substitute => "substitute",
            Self::Delete => "delete",
            Self::Insert => "insert",
            Self::MatchEdge => "match_edge",
            Self::SubstituteEdge => "substitute_edge",
            Self::DeleteEdge => "delete_edge",
            Self::InsertEdge => "insert_edge",
        }
    }

    /// Node operations come before any edge operation in an edit path.
    #[must_use]
    pub const fn is_node_op(self) -> bool {
        matches!(
            self,
            Self::Match | Self::Substitute | Self::Delete | Self::Insert
        )
    }

    /// Match kinds cost nothing.
    #[must_use]
    pub const fn is_match(self) -> bool {
        matches!(self, Self::Match | Self::MatchEdge)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl EditOp {
    /// Kind of this operation.
    #[must_use]
    pub const fn kind(&self) -> OpKind {
        match self {
            Self::Match { .. } => OpKind::Match,
            Self::Substitute { .. } => OpKind::Substitute,
            Self::Delete { .. } => OpKind::Delete,
            Self::Insert { .. } => OpKind::Insert,
            Self::MatchEdge { .. } => OpKind::MatchEdge,
            Self::SubstituteEdge { .. } => OpKind::SubstituteEdge,
            Self::DeleteEdge { .. } => OpKind::DeleteEdge,
            Self::InsertEdge { .. } => OpKind::InsertEdge,
        }
    }

    /// Source node the operation acts on, for node operations other than insert.
    #[must_use]
    pub const fn graph1_node(&self) -> Option<usize> {
        match self {
            Self::Match { graph1_node, .. }
            | Self::Substitute { graph1_node, .. }
            | Self::Delete { graph1_node, .. } => Some(*graph1_node),
            _ => None,
        }
    }

    /// Working graph edge the operation acts on, for edge operations other than insert.
    #[must_use]
    pub const fn graph1_edge(&self) -> Option<[usize; 2]> {
        match self {
            Self::MatchEdge { graph1_edge, .. }
            | Self::SubstituteEdge { graph1_edge, .. }
            | Self::DeleteEdge { graph1_edge, .. } => Some(*graph1_edge),
            _ => None,
        }
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match {
                graph1_node,
                graph2_node,
                label,
            } => write!(f, "match {graph1_node} -> {graph2_node} [{label}]"),
            Self::Substitute {
                graph1_node,
                graph2_node,
                graph1_label,
                graph2_label,
            } => write!(
                f,
                "substitute {graph1_node} -> {graph2_node} [{graph1_label}] => [{graph2_label}]"
            ),
            Self::Delete {
                graph1_node,
                graph1_label,
            } => write!(f, "delete {graph1_node} [{graph1_label}]"),
            Self::Insert {
                graph2_node,
                graph2_label,
            } => write!(f, "insert {graph2_node} [{graph2_label}]"),
            Self::MatchEdge {
                graph1_edge: [a, b],
                graph2_edge: [c, d],
                label,
            } => write!(f, "match_edge ({a}, {b}) -> ({c}, {d}) [{label}]"),
            Self::SubstituteEdge {
                graph1_edge: [a, b],
                graph2_edge: [c, d],
                graph1_label,
                graph2_label,
            } => write!(
                f,
                "substitute_edge ({a}, {b}) -> ({c}, {d}) [{graph1_label}] => [{graph2_label}]"
            ),
            Self::DeleteEdge {
                graph1_edge: [a, b],
                note: Some(note),
            } => write!(f, "delete_edge ({a}, {b}) ({note})"),
            Self::DeleteEdge {
                graph1_edge: [a, b],
                note: None,
            } => write!(f, "delete_edge ({a}, {b})"),
            Self::InsertEdge {
                graph2_edge: [a, b],
            } => write!(f, "insert_edge ({a}, {b})"),
        }
    }
}
