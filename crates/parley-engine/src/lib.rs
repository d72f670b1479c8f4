//! Parley — conversation bounded context.
//!
//! Responsible for walking a branch graph one line at a time: revealing
//! text, waiting for the player, presenting choices, and holding each
//! branch transition until its visual effects have finished.

pub mod application;
pub mod domain;

pub use application::engine::ConversationEngine;
pub use application::handle::ConversationHandle;
pub use application::handoff::{InMemoryHandoffStore, JsonFileHandoffStore};
pub use domain::state::{ConversationOutcome, ConversationPhase, ConversationState, PlayerInput};
pub use domain::transition::{BranchExit, exit_for};
pub use domain::typing::{RevealStep, TypingPlayer, TypingState};
