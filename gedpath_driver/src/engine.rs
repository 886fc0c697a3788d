//! The seam to the external GED engine.
//!
//! The engine computes a node correspondence and distance bounds for a pair of
//! graphs. [`RunFileEngine`] serves runs an engine exported to JSON ahead of
//! time; other engines plug in by implementing [`GedEngine`].

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use gedpath_common::{AttributedGraph, BoundKind, GedMethod};
use gedpath_extract::Correspondence;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::DriverError;

/// Indices of two graphs within a collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GraphPair {
    /// Index of graph 1
    pub graph1: usize,
    /// Index of graph 2
    pub graph2: usize,
}

impl GraphPair {
    /// Pair graph `graph1` with graph `graph2`.
    #[must_use]
    pub const fn new(graph1: usize, graph2: usize) -> Self {
        Self { graph1, graph2 }
    }

    /// All pairs `start <= i < j < n`, ordered by `(i, j)`.
    pub fn upper_triangle(start: usize, n: usize) -> impl Iterator<Item = Self> {
        (start..n).flat_map(move |i| (i + 1..n).map(move |j| Self::new(i, j)))
    }
}

/// Result of running a method on one graph pair.
///
/// `node_map` has one entry per node of graph 1, `null` meaning the node has
/// no counterpart. `runtime` is in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineRun {
    /// Method that produced the run
    pub method: GedMethod,
    /// Index of graph 1
    pub graph1: usize,
    /// Index of graph 2
    pub graph2: usize,
    /// Node correspondence found by the method
    pub node_map: Correspondence,
    /// Lower bound on the distance, for methods that report one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<f64>,
    /// Upper bound on the distance, for methods that report one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
    /// Engine runtime in seconds
    #[serde(default)]
    pub runtime: f64,
}

impl EngineRun {
    /// Graph pair of the run.
    #[must_use]
    pub const fn pair(&self) -> GraphPair {
        GraphPair::new(self.graph1, self.graph2)
    }

    /// Bound of the given kind, if the engine reported it.
    #[must_use]
    pub const fn bound(&self, kind: BoundKind) -> Option<f64> {
        match kind {
            BoundKind::Lower => self.lower_bound,
            BoundKind::Upper => self.upper_bound,
        }
    }

    /// The bound the run's method reports.
    pub fn distance(&self) -> Result<f64, DriverError> {
        let kind = self
            .method
            .bound_kind()
            .ok_or_else(|| gedpath_common::MethodError::Disallowed(self.method.to_string()))?;
        self.bound(kind).ok_or(DriverError::MissingBound {
            method: self.method,
            graph1: self.graph1,
            graph2: self.graph2,
            bound: match kind {
                BoundKind::Lower => "lower",
                BoundKind::Upper => "upper",
            },
        })
    }
}

/// Computes correspondences and bounds for graph pairs.
pub trait GedEngine: Send + Sync {
    fn run(
        &self,
        method: GedMethod,
        pair: GraphPair,
        graph1: &AttributedGraph,
        graph2: &AttributedGraph,
    ) -> Result<EngineRun, DriverError>;
}

/// Engine backed by previously exported runs.
#[derive(Clone, Debug, Default)]
pub struct RunFileEngine {
    runs: HashMap<(GedMethod, GraphPair), EngineRun>,
}

impl RunFileEngine {
    /// Index runs by method and pair. Later runs replace earlier ones.
    #[must_use]
    pub fn from_runs(runs: impl IntoIterator<Item = EngineRun>) -> Self {
        let runs = runs
            .into_iter()
            .map(|run| ((run.method, run.pair()), run))
            .collect();
        Self { runs }
    }

    /// Read a JSON array of runs.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DriverError> {
        let runs: Vec<EngineRun> = serde_json::from_reader(reader)?;
        Ok(Self::from_runs(runs))
    }

    /// Read runs from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, DriverError> {
        let file = File::open(path).map_err(|e| DriverError::read(path, e))?;
        let runs: Vec<EngineRun> =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| DriverError::parse(path, e))?;
        info!("loaded {} engine runs from {}", runs.len(), path.display());
        Ok(Self::from_runs(runs))
    }

    /// Number of stored runs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Returns true if no runs are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

impl GedEngine for RunFileEngine {
    fn run(
        &self,
        method: GedMethod,
        pair: GraphPair,
        _graph1: &AttributedGraph,
        _graph2: &AttributedGraph,
    ) -> Result<EngineRun, DriverError> {
        debug!("looking up {} run for {:?}", method, pair);
        self.runs
            .get(&(method, pair))
            .cloned()
            .ok_or(DriverError::MissingRun {
                method,
                graph1: pair.graph1,
                graph2: pair.graph2,
            })
    }
}
