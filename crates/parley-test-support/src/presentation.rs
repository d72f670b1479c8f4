//! Test presentation — records every call made by the engine.

use std::sync::Mutex;

use parley_core::presentation::{ChoiceOption, PresentationPort};

use crate::timeline::Timeline;

/// One recorded `PresentationPort` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationCall {
    SpeakerVisible { speaker: usize, visible: bool },
    SpeakerName { speaker: usize, text: String },
    DialogueText { speaker: usize, text: String },
    AdvanceIndicator { speaker: usize, visible: bool },
    ChoicePanelShown(Vec<ChoiceOption>),
    ChoicePanelHidden,
}

/// A presentation port that records all calls.
///
/// Dialogue text and choice panel calls are also pushed to the shared
/// `Timeline` as `text:<speaker>:<text>`, `choices:<label>|<label>` and
/// `choices:hidden`.
#[derive(Debug)]
pub struct RecordingPresentation {
    speakers: usize,
    calls: Mutex<Vec<PresentationCall>>,
    timeline: Timeline,
}

impl RecordingPresentation {
    /// Create a recorder with `speakers` bound slots.
    #[must_use]
    pub fn new(speakers: usize) -> Self {
        Self::with_timeline(speakers, Timeline::new())
    }

    /// Create a recorder that also writes to `timeline`.
    #[must_use]
    pub fn with_timeline(speakers: usize, timeline: Timeline) -> Self {
        Self {
            speakers,
            calls: Mutex::new(Vec::new()),
            timeline,
        }
    }

    /// Returns a snapshot of all recorded calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<PresentationCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Every dialogue text set on `speaker`, in order.
    pub fn dialogue_texts(&self, speaker: usize) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PresentationCall::DialogueText { speaker: s, text } if s == speaker => Some(text),
                _ => None,
            })
            .collect()
    }

    /// The most recent dialogue text set on any speaker.
    pub fn last_dialogue_text(&self) -> Option<String> {
        self.calls().into_iter().rev().find_map(|call| match call {
            PresentationCall::DialogueText { text, .. } => Some(text),
            _ => None,
        })
    }

    /// The most recently shown choice panel.
    pub fn last_choice_panel(&self) -> Option<Vec<ChoiceOption>> {
        self.calls().into_iter().rev().find_map(|call| match call {
            PresentationCall::ChoicePanelShown(options) => Some(options),
            _ => None,
        })
    }

    /// Number of times the advance indicator was switched on.
    pub fn indicator_shown_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, PresentationCall::AdvanceIndicator { visible: true, .. }))
            .count()
    }

    fn record(&self, call: PresentationCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PresentationPort for RecordingPresentation {
    fn speaker_count(&self) -> usize {
        self.speakers
    }

    fn set_speaker_visible(&self, speaker: usize, visible: bool) {
        self.record(PresentationCall::SpeakerVisible { speaker, visible });
    }

    fn set_speaker_name(&self, speaker: usize, text: &str) {
        self.record(PresentationCall::SpeakerName {
            speaker,
            text: text.to_owned(),
        });
    }

    fn set_speaker_dialogue_text(&self, speaker: usize, text: &str) {
        self.timeline.push(format!("text:{speaker}:{text}"));
        self.record(PresentationCall::DialogueText {
            speaker,
            text: text.to_owned(),
        });
    }

    fn show_advance_indicator(&self, speaker: usize, visible: bool) {
        self.record(PresentationCall::AdvanceIndicator { speaker, visible });
    }

    fn show_choice_panel(&self, choices: &[ChoiceOption]) {
        let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
        self.timeline.push(format!("choices:{}", labels.join("|")));
        self.record(PresentationCall::ChoicePanelShown(choices.to_vec()));
    }

    fn hide_choice_panel(&self) {
        self.timeline.push("choices:hidden");
        self.record(PresentationCall::ChoicePanelHidden);
    }
}
