//! Corrnet Core: builds clustered correlation networks from pairwise records.
//!
//! This crate contains all network logic: row parsing, node indexing,
//! threshold filtering, incremental connected-component tracking, and group
//! decoration, plus the TSV reader and JSON writer around them.

pub mod config;
pub mod error;
pub mod graph;
pub mod input;
pub mod output;
pub mod phases;
pub mod pipeline;

pub use error::{NetworkError, Result};
pub use pipeline::compute_network;
