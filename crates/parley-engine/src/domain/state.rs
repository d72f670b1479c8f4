//! Conversation phases, inputs and outcomes.

use std::sync::Arc;

use parley_core::error::DialogueError;
use parley_core::handoff::SceneHandoff;
use parley_core::presentation::ChoiceHandle;
use parley_graph::Branch;

/// Where the conversation state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationPhase {
    #[default]
    Idle,
    /// Waiting for a branch's start effect to finish.
    AwaitingStartEffect,
    /// A line is being typed out.
    Revealing,
    /// A line is fully shown; the next advance moves on.
    AwaitingAdvanceInput,
    /// The choice panel is up.
    ShowingChoices,
    /// Waiting for the end effect of the branch being left.
    AwaitingEndEffect,
    Ended,
}

/// Input a player can send to a running conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// Skip the current reveal, or move past a fully shown line.
    Advance,
    /// Select an option of the visible choice panel.
    Choose(ChoiceHandle),
}

/// How a conversation run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationOutcome {
    /// Traversal reached an explicit or implicit end.
    Finished,
    /// A choice sent the player to another scene. The hand-off has already
    /// been offered to the store.
    SceneTransition(SceneHandoff),
    /// Traversal could not continue.
    Aborted(DialogueError),
}

/// Engine-owned cursor over the conversation.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    /// Branch being played.
    pub active_branch: Option<Arc<Branch>>,
    /// Index of the line shown last, `None` before the first line.
    pub line_cursor: Option<usize>,
    /// Speaker of the line shown last.
    pub current_speaker: Option<usize>,
    pub is_active: bool,
    pub is_revealing: bool,
}

impl ConversationState {
    /// Makes `branch` active with no line shown yet.
    pub fn enter(&mut self, branch: Arc<Branch>) {
        self.active_branch = Some(branch);
        self.line_cursor = None;
        self.is_revealing = false;
    }

    /// Id of the active branch.
    #[must_use]
    pub fn active_branch_id(&self) -> Option<&str> {
        self.active_branch.as_deref().map(|branch| branch.id.as_str())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_clears_line_cursor_but_keeps_speaker() {
        // Arrange
        let mut state = ConversationState {
            line_cursor: Some(2),
            current_speaker: Some(1),
            is_active: true,
            ..ConversationState::default()
        };

        // Act
        state.enter(Arc::new(Branch::new("B")));

        // Assert
        assert_eq!(state.active_branch_id(), Some("B"));
        assert_eq!(state.line_cursor, None);
        assert_eq!(state.current_speaker, Some(1));
        assert!(state.is_active);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = ConversationState::default();
        state.enter(Arc::new(Branch::new("A")));
        state.is_active = true;

        state.reset();

        assert_eq!(state.active_branch_id(), None);
        assert!(!state.is_active);
    }
}
