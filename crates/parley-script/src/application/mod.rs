//! Application layer for the scripted dialogue context.

pub mod loader;
pub mod runner;
