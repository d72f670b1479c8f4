//! Plays the bundled demo conversation end to end.

use std::sync::Arc;

use parley_core::config::DialogueConfig;
use parley_core::effect::BlurValues;
use parley_effects::EffectQueue;
use parley_engine::{ConversationEngine, ConversationOutcome, InMemoryHandoffStore};
use parley_graph::ConversationSource;
use parley_player::{ConsoleEffectBackend, ConsolePresentation, autoplay, speaker_slots};
use parley_test_support::FixedClock;

const DEMO: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/lighthouse.yaml");

#[test]
fn test_demo_conversation_is_clean() {
    let source = ConversationSource::from_path(DEMO).unwrap();

    assert!(source.validate().is_empty());
    assert_eq!(speaker_slots(&source), 2);
}

#[tokio::test(start_paused = true)]
async fn test_demo_conversation_plays_to_the_end() {
    // Arrange
    let source = ConversationSource::from_path(DEMO).unwrap();
    let presentation = Arc::new(ConsolePresentation::new(speaker_slots(&source), Vec::new()));
    let backend = Arc::new(ConsoleEffectBackend::new(BlurValues { start: 0.0, end: 1.4 }));
    let (mut engine, handle) = ConversationEngine::new(
        DialogueConfig::default(),
        presentation.clone(),
        EffectQueue::new(Some(backend)),
        Arc::new(InMemoryHandoffStore::new()),
        Arc::new(FixedClock::reference()),
    );

    // Act
    let (outcome, _) = tokio::join!(engine.start_conversation(&source), autoplay(handle, 50));

    // Assert
    assert_eq!(outcome, ConversationOutcome::Finished);
    drop(engine);
    let printed = Arc::try_unwrap(presentation)
        .ok()
        .map(|p| String::from_utf8(p.into_inner()).unwrap())
        .unwrap();
    assert_eq!(
        printed,
        "Keeper: You came back.\n\
         Traveller: The lamp was dark.\n\
         Keeper: Then help me climb.\n  \
         1) Climb the stairs\n  \
         2) Take the boat\n  \
         3) Say nothing\n\
         Traveller: It still turns.\n\
         Keeper: Light for another night.\n"
    );
}
