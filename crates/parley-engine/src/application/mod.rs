//! Application layer for the conversation context.

pub mod engine;
pub mod handle;
pub mod handoff;
mod stage;
