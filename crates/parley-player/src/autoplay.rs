//! Automatic player input.

use parley_core::presentation::ChoiceHandle;
use parley_engine::{ConversationHandle, ConversationPhase};
use parley_graph::ConversationSource;
use tracing::{debug, warn};

/// Number of speaker slots a source needs: one past the highest speaker
/// index used by any line, and at least one.
#[must_use]
pub fn speaker_slots(source: &ConversationSource) -> usize {
    source
        .groups
        .iter()
        .flat_map(|group| &group.branches)
        .flat_map(|branch| &branch.lines)
        .map(|line| line.speaker_index + 1)
        .max()
        .unwrap_or(1)
}

/// Plays a conversation without a human: advances every fully shown line
/// and picks the first option of every choice panel.
///
/// Stops when the conversation ends or after `max_inputs` inputs. Returns
/// the number of inputs sent. Dropping the handle on return aborts a
/// conversation that is still waiting for input.
pub async fn autoplay(mut handle: ConversationHandle, max_inputs: usize) -> usize {
    let mut sent = 0;
    while sent < max_inputs {
        let phase = match handle.next_phase().await {
            Ok(phase) => phase,
            Err(_) => return sent,
        };
        let result = match phase {
            ConversationPhase::AwaitingAdvanceInput => handle.advance().await,
            ConversationPhase::ShowingChoices => handle.choose(ChoiceHandle(0)).await,
            ConversationPhase::Ended => return sent,
            other => {
                debug!(phase = ?other, "waiting");
                continue;
            }
        };
        if result.is_err() {
            return sent;
        }
        sent += 1;
    }
    warn!(max_inputs, "input limit reached; leaving the conversation");
    sent
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parley_core::config::DialogueConfig;
    use parley_core::error::DialogueError;
    use parley_effects::EffectQueue;
    use parley_engine::{ConversationEngine, ConversationOutcome, InMemoryHandoffStore};
    use parley_graph::{Branch, BranchGroup, ChoiceTarget};
    use parley_test_support::{FixedClock, RecordingPresentation};

    use super::*;

    fn engine() -> (ConversationEngine, ConversationHandle) {
        ConversationEngine::new(
            DialogueConfig::default(),
            Arc::new(RecordingPresentation::new(2)),
            EffectQueue::new(None),
            Arc::new(InMemoryHandoffStore::new()),
            Arc::new(FixedClock::reference()),
        )
    }

    fn source(branches: Vec<Branch>) -> ConversationSource {
        ConversationSource::new(1, vec![BranchGroup::new("main", branches)])
    }

    #[test]
    fn test_speaker_slots_follow_highest_index() {
        let with_lines = source(vec![
            Branch::new("A").with_line(0, "Mira", "a").with_line(3, "Oren", "b"),
        ]);

        assert_eq!(speaker_slots(&with_lines), 4);
        assert_eq!(speaker_slots(&source(vec![Branch::new("A")])), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_walks_lines_and_first_choices_to_the_end() {
        // Arrange
        let (mut engine, handle) = engine();
        let source = source(vec![
            Branch::new("A")
                .with_line(0, "Mira", "hi")
                .with_choice("On", ChoiceTarget::GotoBranch("B".to_owned()))
                .with_choice("Off", ChoiceTarget::EndConversation),
            Branch::new("B").with_line(1, "Oren", "bye"),
        ]);

        // Act
        let (outcome, sent) =
            tokio::join!(engine.start_conversation(&source), autoplay(handle, 100));

        // Assert
        assert_eq!(outcome, ConversationOutcome::Finished);
        assert_eq!(sent, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_limit_aborts_endless_conversation() {
        // Arrange
        let (mut engine, handle) = engine();
        let looping = source(vec![
            Branch::new("A").with_line(0, "Mira", "again").with_auto_next("A"),
        ]);

        // Act
        let (outcome, sent) =
            tokio::join!(engine.start_conversation(&looping), autoplay(handle, 5));

        // Assert
        assert_eq!(sent, 5);
        assert_eq!(outcome, ConversationOutcome::Aborted(DialogueError::EngineClosed));
    }
}
