//! Domain layer for the conversation context.

pub mod state;
pub mod transition;
pub mod typing;
