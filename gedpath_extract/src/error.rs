//! Error types for edit path extraction.
//!
//! Extraction itself cannot fail once its inputs are accepted: every error here
//! is an input contract violation detected while building or validating a
//! [`Correspondence`](crate::Correspondence).

use thiserror::Error;

/// Input contract violations. Extraction never produces partial output.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// A source node is matched to a node graph 2 does not have.
    #[error(
        "source node {node} is matched to target node {target}, but graph 2 has {num_nodes} nodes"
    )]
    TargetOutOfRange {
        node: usize,
        target: usize,
        num_nodes: usize,
    },

    /// The correspondence has entries past the end of graph 1.
    #[error("correspondence references source node {node}, but graph 1 has {num_nodes} nodes")]
    UndefinedSourceNode { node: usize, num_nodes: usize },

    /// Two source nodes claim the same target node.
    #[error("target node {target} is matched by both source node {first} and source node {second}")]
    DuplicateTarget {
        target: usize,
        first: usize,
        second: usize,
    },
}

impl ExtractError {
    /// Create a target out of range error.
    pub const fn target_out_of_range(node: usize, target: usize, num_nodes: usize) -> Self {
        Self::TargetOutOfRange {
            node,
            target,
            num_nodes,
        }
    }

    /// Create an undefined source node error.
    pub const fn undefined_source(node: usize, num_nodes: usize) -> Self {
        Self::UndefinedSourceNode { node, num_nodes }
    }
}
