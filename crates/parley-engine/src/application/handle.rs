//! Player-facing handle to a conversation engine.

use parley_core::error::DialogueError;
use parley_core::presentation::ChoiceHandle;
use tokio::sync::{mpsc, watch};

use crate::domain::state::{ConversationPhase, PlayerInput};

/// Sends player input to a `ConversationEngine` and observes its phase.
///
/// The handle stays valid across conversations run by the same engine.
/// When every handle is dropped, a running conversation aborts with
/// `DialogueError::EngineClosed` at its next input wait.
#[derive(Debug, Clone)]
pub struct ConversationHandle {
    inputs: mpsc::Sender<PlayerInput>,
    phase: watch::Receiver<ConversationPhase>,
}

impl ConversationHandle {
    pub(crate) fn new(
        inputs: mpsc::Sender<PlayerInput>,
        phase: watch::Receiver<ConversationPhase>,
    ) -> Self {
        Self { inputs, phase }
    }

    /// Skips the current reveal, or moves past a fully shown line.
    ///
    /// # Errors
    ///
    /// Returns `DialogueError::EngineClosed` if the engine was dropped.
    pub async fn advance(&self) -> Result<(), DialogueError> {
        self.send(PlayerInput::Advance).await
    }

    /// Selects an option of the visible choice panel.
    ///
    /// # Errors
    ///
    /// Returns `DialogueError::EngineClosed` if the engine was dropped.
    pub async fn choose(&self, choice: ChoiceHandle) -> Result<(), DialogueError> {
        self.send(PlayerInput::Choose(choice)).await
    }

    /// The most recently published phase.
    #[must_use]
    pub fn phase(&self) -> ConversationPhase {
        *self.phase.borrow()
    }

    /// Waits for a phase update this handle has not seen yet and returns
    /// it. Intermediate phases published in quick succession collapse into
    /// the latest one.
    ///
    /// # Errors
    ///
    /// Returns `DialogueError::EngineClosed` if the engine was dropped
    /// first.
    pub async fn next_phase(&mut self) -> Result<ConversationPhase, DialogueError> {
        self.phase
            .changed()
            .await
            .map_err(|_| DialogueError::EngineClosed)?;
        Ok(*self.phase.borrow_and_update())
    }

    /// Waits for the engine to publish `phase`.
    ///
    /// Only updates this handle has not seen yet count, so after sending
    /// an input, waiting for the phase the engine was already in waits for
    /// it to be entered again.
    ///
    /// # Errors
    ///
    /// Returns `DialogueError::EngineClosed` if the engine was dropped
    /// first.
    pub async fn wait_for_phase(&mut self, phase: ConversationPhase) -> Result<(), DialogueError> {
        while self.next_phase().await? != phase {}
        Ok(())
    }

    async fn send(&self, input: PlayerInput) -> Result<(), DialogueError> {
        self.inputs
            .send(input)
            .await
            .map_err(|_| DialogueError::EngineClosed)
    }
}
