//! Network construction phases, run in order by the pipeline.

pub mod clusters;
pub mod decorate;
pub mod nodes;
pub mod rows;
