//! Test hand-off stores.

use async_trait::async_trait;
use parley_core::error::DialogueError;
use parley_core::handoff::{SceneHandoff, SceneHandoffStore};

/// A hand-off store whose every operation fails. Useful for testing that a
/// scene transition still ends the conversation.
#[derive(Debug)]
pub struct FailingHandoffStore;

#[async_trait]
impl SceneHandoffStore for FailingHandoffStore {
    async fn save(&self, _handoff: &SceneHandoff) -> Result<(), DialogueError> {
        Err(DialogueError::Persistence("disk full".into()))
    }

    async fn take(&self) -> Result<Option<SceneHandoff>, DialogueError> {
        Err(DialogueError::Persistence("disk full".into()))
    }
}
