//! Domain layer for the scripted dialogue context.

pub mod error;
pub mod names;
pub mod node;
