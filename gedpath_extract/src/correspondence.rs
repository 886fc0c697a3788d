//! Node correspondence between graph 1 and graph 2.

use std::collections::BTreeMap;

use contracts::*;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// What a single source node corresponds to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeAssignment {
    /// The source node corresponds to this target node.
    Matched(usize),
    /// The source node has no counterpart and is deleted.
    Unmatched,
}

impl NodeAssignment {
    /// Target node index, if matched.
    #[must_use]
    pub const fn target(self) -> Option<usize> {
        match self {
            Self::Matched(t) => Some(t),
            Self::Unmatched => None,
        }
    }

    /// Returns true for `Matched`.
    #[must_use]
    pub const fn is_matched(self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

impl From<Option<usize>> for NodeAssignment {
    fn from(target: Option<usize>) -> Self {
        target.map_or(Self::Unmatched, Self::Matched)
    }
}

/// Injective partial mapping from source nodes to target nodes.
///
/// Source nodes past the end of the stored assignments are unmatched. Target
/// nodes that no source node maps to are insertions.
///
/// On the wire a correspondence is a node map: one entry per source node,
/// holding the target index or `null` for "no corresponding node".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Option<usize>>", into = "Vec<Option<usize>>")]
pub struct Correspondence {
    /// Source to target assignment, indexed by source node
    source_to_target: Vec<NodeAssignment>,
    /// Target to source inverse of the matched entries
    target_to_source: BTreeMap<usize, usize>,
}

impl Correspondence {
    /// Checks that the forward and inverse maps describe the same injective mapping.
    pub fn is_consistent(&self) -> bool {
        let matched = self
            .source_to_target
            .iter()
            .filter(|a| a.is_matched())
            .count();
        if matched != self.target_to_source.len() {
            return false;
        }
        self.target_to_source
            .iter()
            .all(|(&t, &s)| self.get(s) == NodeAssignment::Matched(t))
    }

    /// Creates an empty correspondence (every source node unmatched).
    #[ensures(ret.is_consistent())]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps node `i` to node `i` for every `i < n`.
    #[ensures(ret.is_consistent())]
    #[must_use]
    pub fn identity(n: usize) -> Self {
        Self {
            source_to_target: (0..n).map(NodeAssignment::Matched).collect(),
            target_to_source: (0..n).map(|i| (i, i)).collect(),
        }
    }

    /// Builds a correspondence from a node map, `None` meaning "no corresponding node".
    pub fn from_node_map(node_map: &[Option<usize>]) -> Result<Self, ExtractError> {
        let mut correspondence = Self::new();
        for (source, target) in node_map.iter().enumerate() {
            correspondence.assign(source, (*target).into())?;
        }
        Ok(correspondence)
    }

    /// Record the assignment of `source`, replacing any previous one.
    ///
    /// Fails if another source node is already matched to the same target.
    #[debug_ensures(self.is_consistent())]
    pub fn assign(
        &mut self,
        source: usize,
        assignment: NodeAssignment,
    ) -> Result<(), ExtractError> {
        if let NodeAssignment::Matched(target) = assignment {
            if let Some(&first) = self.target_to_source.get(&target) {
                if first != source {
                    return Err(ExtractError::DuplicateTarget {
                        target,
                        first,
                        second: source,
                    });
                }
            }
        }

        if source >= self.source_to_target.len() {
            self.source_to_target
                .resize(source + 1, NodeAssignment::Unmatched);
        }
        if let NodeAssignment::Matched(old) = self.source_to_target[source] {
            self.target_to_source.remove(&old);
        }
        self.source_to_target[source] = assignment;
        if let NodeAssignment::Matched(target) = assignment {
            self.target_to_source.insert(target, source);
        }
        Ok(())
    }

    /// Assignment of a source node. Nodes never assigned are unmatched.
    #[must_use]
    pub fn get(&self, source: usize) -> NodeAssignment {
        self.source_to_target
            .get(source)
            .copied()
            .unwrap_or(NodeAssignment::Unmatched)
    }

    /// Source node matched to `target`, if any.
    #[must_use]
    pub fn source_of(&self, target: usize) -> Option<usize> {
        self.target_to_source.get(&target).copied()
    }

    /// Returns true if some source node is matched to `target`.
    #[must_use]
    pub fn is_in_image(&self, target: usize) -> bool {
        self.target_to_source.contains_key(&target)
    }

    /// Number of stored source entries (matched or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.source_to_target.len()
    }

    /// Returns true if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source_to_target.is_empty()
    }

    /// Number of matched source nodes.
    #[must_use]
    pub fn matched_len(&self) -> usize {
        self.target_to_source.len()
    }

    /// Matched `(source, target)` pairs in ascending source order.
    pub fn matched_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.source_to_target
            .iter()
            .enumerate()
            .filter_map(|(s, a)| a.target().map(|t| (s, t)))
    }

    /// Check the correspondence against the graphs it is used with.
    pub fn validate(&self, source_nodes: usize, target_nodes: usize) -> Result<(), ExtractError> {
        if self.source_to_target.len() > source_nodes {
            return Err(ExtractError::undefined_source(
                self.source_to_target.len() - 1,
                source_nodes,
            ));
        }
        if let Some((node, target)) = self.matched_pairs().find(|&(_, t)| t >= target_nodes) {
            return Err(ExtractError::target_out_of_range(node, target, target_nodes));
        }
        Ok(())
    }

    /// Node map form: one entry per stored source node.
    #[must_use]
    pub fn to_node_map(&self) -> Vec<Option<usize>> {
        self.source_to_target.iter().map(|a| a.target()).collect()
    }
}

impl TryFrom<Vec<Option<usize>>> for Correspondence {
    type Error = ExtractError;

    fn try_from(node_map: Vec<Option<usize>>) -> Result<Self, Self::Error> {
        Self::from_node_map(&node_map)
    }
}

impl From<Correspondence> for Vec<Option<usize>> {
    fn from(correspondence: Correspondence) -> Self {
        correspondence.to_node_map()
    }
}
