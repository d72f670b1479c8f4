//! Shared test doubles for the Parley dialogue runtime.

mod clock;
mod effects;
mod handoff;
mod presentation;
mod timeline;

pub use clock::FixedClock;
pub use effects::{
    GatedEffectBackend, PanickingEffectBackend, RecordingObserver, ScriptedEffectBackend,
};
pub use handoff::FailingHandoffStore;
pub use presentation::{PresentationCall, RecordingPresentation};
pub use timeline::Timeline;
