//! Dataset loading, the GED engine seam and batch scoring.
//!
//! A [`Dataset`] resolves collection indices to cached [`AttributedGraph`]s.
//! A [`GedEngine`] provides the correspondence and bounds for a graph pair,
//! from which [`extract_pair`] derives the edit path and [`score_pairs`]
//! builds a score table over every pair of the collection.
//!
//! [`AttributedGraph`]: gedpath_common::AttributedGraph

mod batch;
mod dataset;
mod engine;
mod error;

pub use batch::{
    PairScore, ParseScoreError, ScoreFormat, UNKNOWN_GROUND_TRUTH, approximation_bound,
    extract_pair, score_pairs, write_scores,
};
pub use dataset::{Collection, Dataset, Driver, GraphEntry, parse_graph};
pub use engine::{EngineRun, GedEngine, GraphPair, RunFileEngine};
pub use error::DriverError;
