//! Catalogue of GED approximation methods understood by the external engine.
//!
//! Method names are matched case-insensitively. Each method reports either a
//! lower or an upper bound of the true edit distance; batch scoring reads the
//! bound matching the method. The machine-learning variants are recognized but
//! rejected: they are not meant for approximating the distance itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when selecting a method by name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MethodError {
    /// Not a method the engine knows about.
    #[error("Invalid GED method: {0}")]
    Unknown(String),

    /// Known to the engine but unsuitable for approximating GED.
    #[error("Method {0} should not be used for approximating GED.")]
    Disallowed(String),
}

/// Which bound of the edit distance a method produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundKind {
    /// The method's value never exceeds the true distance.
    Lower,
    /// The method's value is never below the true distance.
    Upper,
}

/// A GED approximation method, numbered as the engine numbers them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GedMethod {
    /// Branch lower bound.
    Branch,
    /// Fast branch lower bound.
    BranchFast,
    /// Tight branch lower bound.
    BranchTight,
    /// Branch lower bound for uniform costs.
    BranchUniform,
    /// Compact branch lower bound.
    BranchCompact,
    /// Substructure partition lower bound.
    Partition,
    /// Partition and branch hybrid lower bound.
    Hybrid,
    /// Ring-based local search.
    Ring,
    /// Anchor-aware lower bound.
    AnchorAwareGed,
    /// Walk-based assignment.
    Walks,
    /// Integer projected fixed point.
    Ipfp,
    /// Bipartite assignment.
    Bipartite,
    /// Subgraph-based assignment.
    Subgraph,
    /// Node-only assignment.
    Node,
    /// Ring with learned costs, disallowed.
    RingMl,
    /// Bipartite with learned costs, disallowed.
    BipartiteMl,
    /// Swap-based refinement.
    Refine,
    /// Beam search over a bipartite assignment.
    BpBeam,
    /// Simulated annealing.
    SimulatedAnnealing,
    /// Hausdorff edit distance.
    Hed,
    /// Star-based assignment.
    Star,
}

impl GedMethod {
    /// Every method, in engine order.
    pub const ALL: [Self; 21] = [
        Self::Branch,
        Self::BranchFast,
        Self::BranchTight,
        Self::BranchUniform,
        Self::BranchCompact,
        Self::Partition,
        Self::Hybrid,
        Self::Ring,
        Self::AnchorAwareGed,
        Self::Walks,
        Self::Ipfp,
        Self::Bipartite,
        Self::Subgraph,
        Self::Node,
        Self::RingMl,
        Self::BipartiteMl,
        Self::Refine,
        Self::BpBeam,
        Self::SimulatedAnnealing,
        Self::Hed,
        Self::Star,
    ];

    /// Upper-case name as used on the command line and in result files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Branch => "BRANCH",
            Self::BranchFast => "BRANCH_FAST",
            Self::BranchTight => "BRANCH_TIGHT",
            Self::BranchUniform => "BRANCH_UNIFORM",
            Self::BranchCompact => "BRANCH_COMPACT",
            Self::Partition => "PARTITION",
            Self::Hybrid => "HYBRID",
            Self::Ring => "RING",
            Self::AnchorAwareGed => "ANCHOR_AWARE_GED",
            Self::Walks => "WALKS",
            Self::Ipfp => "IPFP",
            Self::Bipartite => "BIPARTITE",
            Self::Subgraph => "SUBGRAPH",
            Self::Node => "NODE",
            Self::RingMl => "RING_ML",
            Self::BipartiteMl => "BIPARTITE_ML",
            Self::Refine => "REFINE",
            Self::BpBeam => "BP_BEAM",
            Self::SimulatedAnnealing => "SIMULATED_ANNEALING",
            Self::Hed => "HED",
            Self::Star => "STAR",
        }
    }

    /// Numeric code of the method in the engine's enumeration.
    #[must_use]
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Inverse of [`GedMethod::code`].
    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Returns false for methods that must not be used to approximate GED.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        !matches!(self, Self::RingMl | Self::BipartiteMl)
    }

    /// Bound reported by the method, `None` for disallowed methods.
    #[must_use]
    pub const fn bound_kind(self) -> Option<BoundKind> {
        match self {
            Self::Branch
            | Self::BranchFast
            | Self::BranchTight
            | Self::BranchUniform
            | Self::BranchCompact
            | Self::Partition
            | Self::Hybrid
            | Self::AnchorAwareGed
            | Self::SimulatedAnnealing
            | Self::Hed
            | Self::Bipartite
            | Self::Node
            | Self::Star => Some(BoundKind::Lower),
            Self::Ring
            | Self::Walks
            | Self::Ipfp
            | Self::Subgraph
            | Self::Refine
            | Self::BpBeam => Some(BoundKind::Upper),
            Self::RingMl | Self::BipartiteMl => None,
        }
    }

    /// Look a method up by name without rejecting disallowed methods.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|m| m.name() == upper)
    }
}

impl FromStr for GedMethod {
    type Err = MethodError;

    /// Parse a method name for GED approximation.
    ///
    /// Disallowed methods are reported separately from unknown names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match Self::lookup(&upper) {
            Some(method) if method.is_allowed() => Ok(method),
            Some(_) => Err(MethodError::Disallowed(upper)),
            None => Err(MethodError::Unknown(upper)),
        }
    }
}

impl fmt::Display for GedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
