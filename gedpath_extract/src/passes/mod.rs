//! The node pass and the two edge passes of [`EditPathExtractor`](crate::EditPathExtractor).

mod edges;
mod nodes;
