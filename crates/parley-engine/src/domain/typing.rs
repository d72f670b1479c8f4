//! Character-by-character text reveal.
//!
//! `TypingPlayer` holds no timer. The caller ticks it once per interval and
//! renders whatever prefix each tick returns; a skip jumps straight to the
//! full text.

use std::time::Duration;

/// Lifecycle of a single reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypingState {
    /// Nothing has been started.
    #[default]
    Idle,
    /// Characters remain to be shown.
    Revealing,
    /// Every character was shown by ticking.
    Completed,
    /// The reveal was cut short and the full text shown at once.
    Skipped,
}

/// What one tick revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealStep<'a> {
    /// Text shown so far, always ending on a character boundary.
    pub revealed: &'a str,
    /// True when this tick showed the last character.
    pub finished: bool,
}

/// Reveals one line of text a code point at a time.
#[derive(Debug, Clone, Default)]
pub struct TypingPlayer {
    text: String,
    /// Byte length of the revealed prefix.
    shown: usize,
    interval: Duration,
    state: TypingState,
}

impl TypingPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins revealing `text`, replacing any reveal in progress.
    pub fn start(&mut self, text: impl Into<String>, interval: Duration) {
        self.text = text.into();
        self.shown = 0;
        self.interval = interval;
        self.state = TypingState::Revealing;
    }

    /// Reveals the next character.
    ///
    /// Returns `None` unless revealing. Empty text finishes on its first
    /// tick with an empty prefix.
    pub fn tick(&mut self) -> Option<RevealStep<'_>> {
        if self.state != TypingState::Revealing {
            return None;
        }
        if let Some(next) = self.text[self.shown..].chars().next() {
            self.shown += next.len_utf8();
        }
        let finished = self.shown == self.text.len();
        if finished {
            self.state = TypingState::Completed;
        }
        Some(RevealStep {
            revealed: &self.text[..self.shown],
            finished,
        })
    }

    /// Shows the whole text at once.
    ///
    /// Returns the full text only on the call that ends a reveal; any later
    /// call, or a call while not revealing, is a no-op returning `None`.
    pub fn skip_to_end(&mut self) -> Option<&str> {
        if self.state != TypingState::Revealing {
            return None;
        }
        self.shown = self.text.len();
        self.state = TypingState::Skipped;
        Some(&self.text)
    }

    /// Drops the current text and returns to `Idle`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn state(&self) -> TypingState {
        self.state
    }

    #[must_use]
    pub fn is_revealing(&self) -> bool {
        self.state == TypingState::Revealing
    }

    /// The prefix shown so far.
    #[must_use]
    pub fn revealed(&self) -> &str {
        &self.text[..self.shown]
    }

    /// Delay between two ticks of the current reveal.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(100);

    fn tick_all(player: &mut TypingPlayer) -> Vec<String> {
        let mut prefixes = Vec::new();
        while let Some(step) = player.tick() {
            prefixes.push(step.revealed.to_owned());
        }
        prefixes
    }

    #[test]
    fn test_tick_reveals_one_character_at_a_time() {
        // Arrange
        let mut player = TypingPlayer::new();
        player.start("hey", INTERVAL);

        // Act
        let prefixes = tick_all(&mut player);

        // Assert
        assert_eq!(prefixes, vec!["h", "he", "hey"]);
        assert_eq!(player.state(), TypingState::Completed);
    }

    #[test]
    fn test_tick_reports_finished_only_on_last_character() {
        let mut player = TypingPlayer::new();
        player.start("ab", INTERVAL);

        assert!(!player.tick().unwrap().finished);
        assert!(player.tick().unwrap().finished);
        assert!(player.tick().is_none());
    }

    #[test]
    fn test_tick_respects_multibyte_characters() {
        let mut player = TypingPlayer::new();
        player.start("né✓", INTERVAL);

        assert_eq!(tick_all(&mut player), vec!["n", "né", "né✓"]);
    }

    #[test]
    fn test_empty_text_finishes_on_first_tick() {
        let mut player = TypingPlayer::new();
        player.start("", INTERVAL);

        let step = player.tick().unwrap();

        assert_eq!(step.revealed, "");
        assert!(step.finished);
        assert_eq!(player.state(), TypingState::Completed);
    }

    #[test]
    fn test_skip_to_end_shows_full_text_once() {
        // Arrange
        let mut player = TypingPlayer::new();
        player.start("hello", INTERVAL);
        player.tick();

        // Act
        let first = player.skip_to_end().map(str::to_owned);
        let second = player.skip_to_end().map(str::to_owned);

        // Assert
        assert_eq!(first.as_deref(), Some("hello"));
        assert_eq!(second, None);
        assert_eq!(player.state(), TypingState::Skipped);
        assert_eq!(player.revealed(), "hello");
        assert!(player.tick().is_none());
    }

    #[test]
    fn test_skip_to_end_is_noop_when_idle_or_completed() {
        let mut player = TypingPlayer::new();
        assert_eq!(player.skip_to_end(), None);

        player.start("a", INTERVAL);
        player.tick();
        assert_eq!(player.skip_to_end(), None);
        assert_eq!(player.state(), TypingState::Completed);
    }

    #[test]
    fn test_start_replaces_previous_reveal() {
        let mut player = TypingPlayer::new();
        player.start("first", INTERVAL);
        player.tick();

        player.start("xy", Duration::from_millis(5));

        assert_eq!(player.revealed(), "");
        assert_eq!(player.interval(), Duration::from_millis(5));
        assert_eq!(tick_all(&mut player), vec!["x", "xy"]);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut player = TypingPlayer::new();
        player.start("abc", INTERVAL);

        player.reset();

        assert_eq!(player.state(), TypingState::Idle);
        assert!(!player.is_revealing());
        assert_eq!(player.revealed(), "");
    }
}
