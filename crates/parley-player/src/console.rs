//! Text presentation writing finished lines and choice panels.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use parley_core::presentation::{ChoiceOption, PresentationPort};
use tracing::{trace, warn};

struct Screen<W> {
    out: W,
    names: Vec<String>,
    texts: Vec<String>,
}

/// Prints each line once it is fully revealed, as `Name: text`, and each
/// choice panel as a numbered list. Partial reveals are only traced.
pub struct ConsolePresentation<W> {
    speakers: usize,
    screen: Mutex<Screen<W>>,
}

impl ConsolePresentation<io::Stdout> {
    /// A presentation printing to standard output.
    #[must_use]
    pub fn stdout(speakers: usize) -> Self {
        Self::new(speakers, io::stdout())
    }
}

impl<W: Write + Send> ConsolePresentation<W> {
    #[must_use]
    pub fn new(speakers: usize, out: W) -> Self {
        Self {
            speakers,
            screen: Mutex::new(Screen {
                out,
                names: vec![String::new(); speakers],
                texts: vec![String::new(); speakers],
            }),
        }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.screen
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .out
    }

    fn screen(&self) -> MutexGuard<'_, Screen<W>> {
        self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> PresentationPort for ConsolePresentation<W> {
    fn speaker_count(&self) -> usize {
        self.speakers
    }

    fn set_speaker_visible(&self, speaker: usize, visible: bool) {
        trace!(speaker, visible, "speaker visibility");
    }

    fn set_speaker_name(&self, speaker: usize, text: &str) {
        if let Some(name) = self.screen().names.get_mut(speaker) {
            text.clone_into(name);
        }
    }

    fn set_speaker_dialogue_text(&self, speaker: usize, text: &str) {
        trace!(speaker, text, "reveal");
        if let Some(current) = self.screen().texts.get_mut(speaker) {
            text.clone_into(current);
        }
    }

    fn show_advance_indicator(&self, speaker: usize, visible: bool) {
        if !visible {
            return;
        }
        let mut screen = self.screen();
        let Screen { out, names, texts } = &mut *screen;
        let (Some(name), Some(text)) = (names.get(speaker), texts.get(speaker)) else {
            return;
        };
        let written = if name.is_empty() {
            writeln!(out, "{text}")
        } else {
            writeln!(out, "{name}: {text}")
        };
        if let Err(e) = written {
            warn!(error = %e, "console write failed");
        }
    }

    fn show_choice_panel(&self, choices: &[ChoiceOption]) {
        let mut screen = self.screen();
        for choice in choices {
            if let Err(e) = writeln!(screen.out, "  {}) {}", choice.handle.0 + 1, choice.label) {
                warn!(error = %e, "console write failed");
                return;
            }
        }
    }

    fn hide_choice_panel(&self) {}
}

#[cfg(test)]
mod tests {
    use parley_core::presentation::ChoiceHandle;

    use super::*;

    fn output(presentation: ConsolePresentation<Vec<u8>>) -> String {
        String::from_utf8(presentation.into_inner()).unwrap()
    }

    #[test]
    fn test_line_is_printed_once_when_indicator_shows() {
        // Arrange
        let presentation = ConsolePresentation::new(1, Vec::new());
        presentation.set_speaker_name(0, "Mira");

        // Act
        presentation.set_speaker_dialogue_text(0, "h");
        presentation.set_speaker_dialogue_text(0, "hi");
        presentation.show_advance_indicator(0, true);
        presentation.show_advance_indicator(0, false);

        // Assert
        assert_eq!(output(presentation), "Mira: hi\n");
    }

    #[test]
    fn test_choice_panel_is_numbered_from_one() {
        let presentation = ConsolePresentation::new(1, Vec::new());

        presentation.show_choice_panel(&[
            ChoiceOption {
                label: "Stay".to_owned(),
                handle: ChoiceHandle(0),
            },
            ChoiceOption {
                label: "Go".to_owned(),
                handle: ChoiceHandle(1),
            },
        ]);

        assert_eq!(output(presentation), "  1) Stay\n  2) Go\n");
    }

    #[test]
    fn test_unnamed_speaker_prints_text_only() {
        let presentation = ConsolePresentation::new(2, Vec::new());

        presentation.set_speaker_dialogue_text(1, "...");
        presentation.show_advance_indicator(1, true);

        assert_eq!(output(presentation), "...\n");
    }
}
