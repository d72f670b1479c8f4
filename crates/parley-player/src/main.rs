//! Parley console player entry point.

use std::error::Error;
use std::sync::Arc;

use parley_core::clock::SystemClock;
use parley_core::config::DialogueConfig;
use parley_core::effect::{BlurValues, EffectObserver};
use parley_core::handoff::SceneHandoffStore;
use parley_effects::{EffectQueue, UiGroups};
use parley_engine::{
    ConversationEngine, ConversationOutcome, InMemoryHandoffStore, JsonFileHandoffStore,
};
use parley_graph::ConversationSource;
use parley_player::{
    ConsoleEffectBackend, ConsolePresentation, ConsoleUiGroups, autoplay, speaker_slots,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("PARLEY_LOG_JSON").is_ok_and(|v| v == "1" || v == "true") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    // Read configuration from arguments and environment.
    let config = DialogueConfig::from_env()?;
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PARLEY_CONVERSATION").ok())
        .ok_or("usage: parley-player <conversation.yaml> (or set PARLEY_CONVERSATION)")?;
    let max_inputs: usize = std::env::var("PARLEY_MAX_INPUTS")
        .unwrap_or_else(|_| "1000".to_string())
        .parse()
        .map_err(|e| format!("PARLEY_MAX_INPUTS must be a valid usize: {e}"))?;

    // Load and check the conversation.
    let source = ConversationSource::from_path(&path)?;
    for issue in source.validate() {
        tracing::warn!(%issue, "authoring issue");
    }
    tracing::info!(path = %path, version = source.version, "conversation loaded");

    // Scene hand-off left by a previous run.
    let handoff: Arc<dyn SceneHandoffStore> = match std::env::var("PARLEY_HANDOFF_PATH") {
        Ok(file) => Arc::new(JsonFileHandoffStore::new(file)),
        Err(_) => Arc::new(InMemoryHandoffStore::new()),
    };
    if let Some(previous) = handoff.take().await? {
        tracing::info!(
            scene_id = %previous.scene_id,
            camera = ?previous.camera_position,
            "arrived through scene hand-off"
        );
    }

    // Wire the collaborators.
    let backend = Arc::new(ConsoleEffectBackend::new(BlurValues {
        start: config.blur_start,
        end: config.blur_end,
    }));
    let groups = Arc::new(UiGroups::new(Arc::new(ConsoleUiGroups::new())));
    groups.add_group("dialogue");
    groups.add_group("hud");
    let observers: Vec<Arc<dyn EffectObserver>> = vec![groups];
    let effects = EffectQueue::with_observers(Some(backend), observers);
    let presentation = Arc::new(ConsolePresentation::stdout(speaker_slots(&source)));

    let (mut engine, handle) =
        ConversationEngine::new(config, presentation, effects, handoff, Arc::new(SystemClock));

    // Play.
    let player = tokio::spawn(autoplay(handle, max_inputs));
    let outcome = engine.start_conversation(&source).await;
    let inputs = player.await?;

    match outcome {
        ConversationOutcome::Finished => {
            tracing::info!(inputs, "conversation finished");
            Ok(())
        }
        ConversationOutcome::SceneTransition(next) => {
            tracing::info!(inputs, scene_id = %next.scene_id, "leaving for another scene");
            Ok(())
        }
        ConversationOutcome::Aborted(e) => Err(e.into()),
    }
}
