//! Edit path extraction for graph edit distance.
//!
//! Given two attributed graphs and a node correspondence produced by some GED
//! approximation method, [`extract_edit_path`] derives the explicit sequence of
//! node and edge operations that transforms graph 1 into graph 2. Labels are
//! compared through their canonical encoding, see
//! [`canonical_label`](gedpath_common::canonical_label).
//!
//! The resulting [`EditPath`] can be replayed and checked against graph 2 with
//! [`verify`].

mod correspondence;
mod error;
mod extractor;
mod ops;
mod passes;
mod path;
mod replay;
mod snapshot;

pub use correspondence::{Correspondence, NodeAssignment};
pub use error::ExtractError;
pub use extractor::{EditPathExtractor, extract_edit_path};
pub use ops::{ENDPOINT_DELETED_NOTE, EditOp, OpKind};
pub use path::EditPath;
pub use replay::{ReplayError, replay, verify};
pub use snapshot::{NodeOrigin, Snapshot};
