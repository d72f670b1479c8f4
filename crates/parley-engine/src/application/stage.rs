//! Bounds-checked access to the presentation port.

use std::sync::Arc;

use parley_core::presentation::{ChoiceOption, PresentationPort};
use tracing::debug;

/// Wraps the presentation port so calls for unbound speaker slots are
/// skipped instead of reaching the UI.
pub(crate) struct Stage {
    port: Arc<dyn PresentationPort>,
}

impl Stage {
    pub(crate) fn new(port: Arc<dyn PresentationPort>) -> Self {
        Self { port }
    }

    fn bound(&self, speaker: usize) -> bool {
        let bound = speaker < self.port.speaker_count();
        if !bound {
            debug!(speaker, "no presentation bound to speaker slot; call skipped");
        }
        bound
    }

    /// Makes `speaker` the only active speaker and clears every indicator.
    pub(crate) fn focus(&self, speaker: usize) {
        self.bound(speaker);
        for slot in 0..self.port.speaker_count() {
            self.port.set_speaker_visible(slot, slot == speaker);
            self.port.show_advance_indicator(slot, false);
        }
    }

    pub(crate) fn name(&self, speaker: usize, name: &str) {
        if self.bound(speaker) {
            self.port.set_speaker_name(speaker, name);
        }
    }

    pub(crate) fn text(&self, speaker: usize, text: &str) {
        if self.bound(speaker) {
            self.port.set_speaker_dialogue_text(speaker, text);
        }
    }

    pub(crate) fn indicator(&self, speaker: usize, visible: bool) {
        if self.bound(speaker) {
            self.port.show_advance_indicator(speaker, visible);
        }
    }

    pub(crate) fn hide_speaker(&self, speaker: usize) {
        if self.bound(speaker) {
            self.port.set_speaker_visible(speaker, false);
        }
    }

    pub(crate) fn hide_all_speakers(&self) {
        for slot in 0..self.port.speaker_count() {
            self.port.set_speaker_visible(slot, false);
        }
    }

    pub(crate) fn show_choices(&self, options: &[ChoiceOption]) {
        self.port.show_choice_panel(options);
    }

    pub(crate) fn hide_choices(&self) {
        self.port.hide_choice_panel();
    }

    /// Hides every speaker, indicator and the choice panel.
    pub(crate) fn clear(&self) {
        for slot in 0..self.port.speaker_count() {
            self.port.set_speaker_visible(slot, false);
            self.port.show_advance_indicator(slot, false);
        }
        self.port.hide_choice_panel();
    }
}

#[cfg(test)]
mod tests {
    use parley_test_support::{PresentationCall, RecordingPresentation};

    use super::*;

    #[test]
    fn test_focus_activates_one_speaker_and_dims_the_rest() {
        // Arrange
        let port = Arc::new(RecordingPresentation::new(3));
        let stage = Stage::new(port.clone());

        // Act
        stage.focus(1);

        // Assert
        let visible: Vec<(usize, bool)> = port
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                PresentationCall::SpeakerVisible { speaker, visible } => Some((speaker, visible)),
                _ => None,
            })
            .collect();
        assert_eq!(visible, vec![(0, false), (1, true), (2, false)]);
    }

    #[test]
    fn test_calls_for_unbound_speaker_are_skipped() {
        let port = Arc::new(RecordingPresentation::new(1));
        let stage = Stage::new(port.clone());

        stage.name(4, "Ghost");
        stage.text(4, "boo");
        stage.indicator(4, true);
        stage.hide_speaker(4);

        assert!(port.calls().is_empty());
    }

    #[test]
    fn test_clear_hides_everything() {
        let port = Arc::new(RecordingPresentation::new(2));
        let stage = Stage::new(port.clone());

        stage.clear();

        let calls = port.calls();
        assert_eq!(calls.len(), 5);
        assert_eq!(calls.last(), Some(&PresentationCall::ChoicePanelHidden));
    }
}
