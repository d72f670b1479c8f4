//! Scene hand-off stores.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use parley_core::error::DialogueError;
use parley_core::handoff::{SceneHandoff, SceneHandoffStore};
use tracing::debug;

/// Keeps the hand-off in process memory.
#[derive(Debug, Default)]
pub struct InMemoryHandoffStore {
    slot: Mutex<Option<SceneHandoff>>,
}

impl InMemoryHandoffStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SceneHandoffStore for InMemoryHandoffStore {
    async fn save(&self, handoff: &SceneHandoff) -> Result<(), DialogueError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(handoff.clone());
        Ok(())
    }

    async fn take(&self) -> Result<Option<SceneHandoff>, DialogueError> {
        Ok(self.slot.lock().unwrap_or_else(PoisonError::into_inner).take())
    }
}

/// Keeps the hand-off as a JSON document on disk, so it survives a process
/// restart between scenes.
#[derive(Debug, Clone)]
pub struct JsonFileHandoffStore {
    path: PathBuf,
}

impl JsonFileHandoffStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SceneHandoffStore for JsonFileHandoffStore {
    async fn save(&self, handoff: &SceneHandoff) -> Result<(), DialogueError> {
        let json = serde_json::to_vec_pretty(handoff)
            .map_err(|e| DialogueError::Persistence(format!("hand-off serialization failed: {e}")))?;
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            DialogueError::Persistence(format!("cannot write {}: {e}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), scene_id = %handoff.scene_id, "scene hand-off saved");
        Ok(())
    }

    async fn take(&self) -> Result<Option<SceneHandoff>, DialogueError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DialogueError::Persistence(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )));
            }
        };
        let handoff = serde_json::from_slice(&bytes)
            .map_err(|e| DialogueError::Persistence(format!("malformed hand-off: {e}")))?;
        tokio::fs::remove_file(&self.path).await.map_err(|e| {
            DialogueError::Persistence(format!("cannot clear {}: {e}", self.path.display()))
        })?;
        Ok(Some(handoff))
    }
}
