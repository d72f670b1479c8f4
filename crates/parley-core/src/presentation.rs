//! Presentation port implemented by the UI layer.

/// Opaque reference to one option of the choice panel.
///
/// Handles are only meaningful for the panel that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChoiceHandle(pub usize);

/// One entry of the choice panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: String,
    pub handle: ChoiceHandle,
}

/// Capabilities the conversation engine needs from the UI.
///
/// Speaker slots are addressed by index; the engine never holds UI handles.
/// Exactly one speaker is active at a time, and implementations render
/// every inactive speaker at a reduced-visibility state. Repeated identical
/// calls must be harmless.
pub trait PresentationPort: Send + Sync {
    /// Number of bound speaker slots. Calls for slots at or beyond this
    /// index are skipped by the engine.
    fn speaker_count(&self) -> usize;

    /// Makes a speaker the active one (`true`) or inactive (`false`).
    fn set_speaker_visible(&self, speaker: usize, visible: bool);

    fn set_speaker_name(&self, speaker: usize, text: &str);

    fn set_speaker_dialogue_text(&self, speaker: usize, text: &str);

    /// Shows or hides the "ready to advance" indicator.
    fn show_advance_indicator(&self, speaker: usize, visible: bool);

    fn show_choice_panel(&self, choices: &[ChoiceOption]);

    fn hide_choice_panel(&self);
}
