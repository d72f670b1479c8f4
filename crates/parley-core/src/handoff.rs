//! Scene hand-off abstraction.
//!
//! A choice that leaves for another scene writes the destination here; the
//! receiving scene reads and clears it once after loading.

use async_trait::async_trait;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::DialogueError;

/// Destination recorded by a `GotoScene` choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneHandoff {
    pub scene_id: String,
    pub camera_position: Vec3,
}

/// Storage that survives a scene load.
#[async_trait]
pub trait SceneHandoffStore: Send + Sync {
    /// Records a hand-off, replacing any previous one.
    async fn save(&self, handoff: &SceneHandoff) -> Result<(), DialogueError>;

    /// Returns the pending hand-off and clears it.
    async fn take(&self) -> Result<Option<SceneHandoff>, DialogueError>;
}
