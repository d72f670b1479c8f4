//! Domain layer for the branch graph context.

pub mod graph;
pub mod model;
