//! Console adapters for playing Parley conversations without a game
//! engine: a text presentation, an effect backend that only waits and
//! logs, UI groups kept in memory, and an automatic player.

pub mod autoplay;
pub mod console;
pub mod effects;
pub mod groups;

pub use autoplay::{autoplay, speaker_slots};
pub use console::ConsolePresentation;
pub use effects::ConsoleEffectBackend;
pub use groups::ConsoleUiGroups;
