//! Common utilities and shared types for the gedpath workspace.
//!
//! This crate provides the attributed graph model, the canonical label encoder,
//! the catalogue of GED approximation methods and configuration handling used
//! across the project.

mod config;
/// Attributed graph model.
pub mod graph;
/// Canonical label encoding.
pub mod label;
mod method;

pub use crate::config::*;
pub use crate::graph::{AttrMap, AttributedGraph, EdgeKey, GraphError};
pub use crate::label::canonical_label;
pub use crate::method::*;
