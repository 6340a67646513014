//! Graph views over a finished network.

pub mod network_graph;
