use std::path::{Path, PathBuf};

use gedpath_common::{GedMethod, GraphError, MethodError};
use gedpath_extract::{ExtractError, ReplayError};
use thiserror::Error;

/// Errors raised while loading datasets, consulting the engine or scoring pairs.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Unattributed I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unattributed JSON failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure writing a CSV table.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A file could not be opened or read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file is not the JSON document expected.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A graph file describes an invalid graph.
    #[error("invalid graph in {}: {source}", .path.display())]
    Graph {
        path: PathBuf,
        #[source]
        source: GraphError,
    },

    /// Two nodes of a graph file share an id.
    #[error("{}: node id '{id}' is defined twice", .path.display())]
    DuplicateNodeId { path: PathBuf, id: String },

    /// An edge names a node id the file does not define.
    #[error("{}: edge references unknown node id '{id}'", .path.display())]
    UnknownNodeId { path: PathBuf, id: String },

    /// An attribute value is an array or object.
    #[error("{}: attribute '{key}' is not a scalar", .path.display())]
    UnsupportedAttribute { path: PathBuf, key: String },

    /// Key or value contains `=` or `;`, which labels cannot encode.
    #[error("{}: attribute '{key}' contains '=' or ';'", .path.display())]
    UnencodableAttribute { path: PathBuf, key: String },

    /// A graph index is outside the collection.
    #[error("graph index {index} out of range. Must be between 0 and {}", .len.saturating_sub(1))]
    IndexOutOfRange { index: usize, len: usize },

    /// The GED method cannot be used.
    #[error(transparent)]
    Method(#[from] MethodError),

    /// The engine correspondence was rejected.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// An extracted edit path did not reproduce graph 2.
    #[error("edit path failed verification: {0}")]
    Replay(#[from] ReplayError),

    /// The engine has no run for the pair.
    #[error("no {method} run recorded for graphs {graph1} and {graph2}")]
    MissingRun {
        method: GedMethod,
        graph1: usize,
        graph2: usize,
    },

    /// The run lacks the bound its method reports.
    #[error("{method} run for graphs {graph1} and {graph2} has no {bound} bound")]
    MissingBound {
        method: GedMethod,
        graph1: usize,
        graph2: usize,
        bound: &'static str,
    },
}

impl DriverError {
    /// Create a read error for `path`.
    pub fn read(path: &Path, source: std::io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a parse error for `path`.
    pub fn parse(path: &Path, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create an index out of range error.
    pub const fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}
