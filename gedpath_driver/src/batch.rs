//! Scoring every graph pair of a collection with one GED method.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use gedpath_common::{BoundKind, Config, GedMethod, MethodError};
use gedpath_extract::{EditPath, extract_edit_path, verify};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::dataset::Dataset;
use crate::engine::{GedEngine, GraphPair};
use crate::error::DriverError;

/// Ground truth placeholder written when no exact distance is known.
pub const UNKNOWN_GROUND_TRUTH: &str = "N/A";

/// Score of one graph pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairScore {
    /// Numeric code of the method
    pub method: u32,
    /// Index of graph 1
    pub graph1: usize,
    /// Index of graph 2
    pub graph2: usize,
    /// The method's bound for this pair
    pub predged: f64,
    /// Exact distance, when known
    pub gtged: Option<f64>,
    /// Engine runtime in seconds
    pub runtime: f64,
    /// Cost of the verified edit path, when verification ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_cost: Option<usize>,
}

impl fmt::Display for PairScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "METHOD={} GRAPH1={} GRAPH2={} PREDGED={} GTGED=",
            self.method, self.graph1, self.graph2, self.predged
        )?;
        match self.gtged {
            Some(gt) => write!(f, "{gt}")?,
            None => f.write_str(UNKNOWN_GROUND_TRUTH)?,
        }
        write!(f, " RUNTIME={}", self.runtime)?;
        if let Some(cost) = self.edit_cost {
            write!(f, " EDITCOST={cost}")?;
        }
        Ok(())
    }
}

/// Errors produced when parsing a score line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseScoreError {
    /// A required `KEY=` token is absent.
    #[error("score line is missing {0}")]
    MissingField(&'static str),

    /// A value does not parse.
    #[error("invalid value '{value}' for {field}")]
    InvalidValue { field: &'static str, value: String },

    /// A token is not a known `KEY=value` pair.
    #[error("unexpected token '{0}' in score line")]
    UnexpectedToken(String),
}

fn parse_field<T: FromStr>(field: &'static str, value: Option<&str>) -> Result<T, ParseScoreError> {
    let value = value.ok_or(ParseScoreError::MissingField(field))?;
    value.parse().map_err(|_| ParseScoreError::InvalidValue {
        field,
        value: value.to_owned(),
    })
}

impl FromStr for PairScore {
    type Err = ParseScoreError;

    /// Parse a `KEY=value` line as written by [`Display`](fmt::Display).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut method = None;
        let mut graph1 = None;
        let mut graph2 = None;
        let mut predged = None;
        let mut gtged = None;
        let mut runtime = None;
        let mut edit_cost = None;

        for token in s.split_whitespace() {
            let (key, value) = token
                .split_once('=')
                .ok_or_else(|| ParseScoreError::UnexpectedToken(token.to_owned()))?;
            let slot = match key {
                "METHOD" => &mut method,
                "GRAPH1" => &mut graph1,
                "GRAPH2" => &mut graph2,
                "PREDGED" => &mut predged,
                "GTGED" => &mut gtged,
                "RUNTIME" => &mut runtime,
                "EDITCOST" => &mut edit_cost,
                // Memory figures from some engine builds are ignored.
                "MEM" => continue,
                _ => return Err(ParseScoreError::UnexpectedToken(token.to_owned())),
            };
            *slot = Some(value);
        }

        let gtged = match gtged {
            None => return Err(ParseScoreError::MissingField("GTGED")),
            Some(UNKNOWN_GROUND_TRUTH) => None,
            Some(value) => Some(parse_field("GTGED", Some(value))?),
        };

        Ok(Self {
            method: parse_field("METHOD", method)?,
            graph1: parse_field("GRAPH1", graph1)?,
            graph2: parse_field("GRAPH2", graph2)?,
            predged: parse_field("PREDGED", predged)?,
            gtged,
            runtime: parse_field("RUNTIME", runtime)?,
            edit_cost: edit_cost.map(|c| parse_field("EDITCOST", Some(c))).transpose()?,
        })
    }
}

/// Accept a method for distance approximation and return the bound it reports.
pub fn approximation_bound(method: GedMethod) -> Result<BoundKind, DriverError> {
    method
        .bound_kind()
        .filter(|_| method.is_allowed())
        .ok_or_else(|| MethodError::Disallowed(method.to_string()).into())
}

/// Run the engine on one pair and extract the edit path for its correspondence.
///
/// The path records the bound the method reports as its distance.
pub fn extract_pair<E: GedEngine + ?Sized>(
    dataset: &Dataset,
    engine: &E,
    method: GedMethod,
    pair: GraphPair,
) -> Result<EditPath, DriverError> {
    approximation_bound(method)?;
    dataset.check_index(pair.graph1)?;
    dataset.check_index(pair.graph2)?;

    let source = dataset.graph(pair.graph1)?;
    let target = dataset.graph(pair.graph2)?;
    let run = engine.run(method, pair, &source, &target)?;
    let distance = run.distance()?;

    Ok(extract_edit_path(&source, &target, &run.node_map, distance)?)
}

fn score_pair<E: GedEngine + ?Sized>(
    dataset: &Dataset,
    engine: &E,
    method: GedMethod,
    kind: BoundKind,
    pair: GraphPair,
    verify_paths: bool,
) -> Result<PairScore, DriverError> {
    let source = dataset.graph(pair.graph1)?;
    let target = dataset.graph(pair.graph2)?;
    let run = engine.run(method, pair, &source, &target)?;
    let predged = run.bound(kind).ok_or(DriverError::MissingBound {
        method,
        graph1: pair.graph1,
        graph2: pair.graph2,
        bound: match kind {
            BoundKind::Lower => "lower",
            BoundKind::Upper => "upper",
        },
    })?;

    let edit_cost = if verify_paths {
        let path = extract_edit_path(&source, &target, &run.node_map, predged)?;
        verify(&path, &source, &target)?;
        debug!(
            "pair ({}, {}): bound {} edit cost {}",
            pair.graph1,
            pair.graph2,
            predged,
            path.edit_cost()
        );
        Some(path.edit_cost())
    } else {
        None
    };

    Ok(PairScore {
        method: method.code(),
        graph1: pair.graph1,
        graph2: pair.graph2,
        predged,
        gtged: None,
        runtime: run.runtime,
        edit_cost,
    })
}

/// Score every pair `config.start_index <= i < j < n` of the dataset.
///
/// The method is validated before any graph is loaded. Scores are returned in
/// `(i, j)` order; the first failing pair aborts the batch.
pub fn score_pairs<E: GedEngine + ?Sized>(
    dataset: &Dataset,
    engine: &E,
    config: &Config,
) -> Result<Vec<PairScore>, DriverError> {
    let method = config.method;
    let kind = approximation_bound(method)?;

    let pairs: Vec<GraphPair> =
        GraphPair::upper_triangle(config.start_index, dataset.len()).collect();
    if pairs.is_empty() {
        warn!(
            "no graph pairs to score (start index {}, {} graphs)",
            config.start_index,
            dataset.len()
        );
    }
    info!(
        "scoring {} pairs with {} ({:?} bound, parallel: {})",
        pairs.len(),
        method,
        kind,
        config.parallel && cfg!(feature = "parallel")
    );

    let score = |pair: &GraphPair| {
        score_pair(dataset, engine, method, kind, *pair, config.verify_paths)
    };

    #[cfg(feature = "parallel")]
    if config.parallel {
        return pairs.par_iter().map(score).collect();
    }

    pairs.iter().map(score).collect()
}

/// Output format of a score table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScoreFormat {
    /// One `KEY=value` line per pair
    #[default]
    Text,
    /// CSV with a header row
    Csv,
    /// A JSON array of scores
    Json,
}

/// Write scores in the requested format.
pub fn write_scores<W: Write>(
    scores: &[PairScore],
    format: ScoreFormat,
    pretty: bool,
    mut writer: W,
) -> Result<(), DriverError> {
    match format {
        ScoreFormat::Text => {
            for score in scores {
                writeln!(writer, "{score}")?;
            }
        }
        ScoreFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for score in scores {
                csv_writer.serialize(score)?;
            }
            csv_writer.flush()?;
        }
        ScoreFormat::Json => {
            if pretty {
                serde_json::to_writer_pretty(&mut writer, scores)?;
            } else {
                serde_json::to_writer(&mut writer, scores)?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}
