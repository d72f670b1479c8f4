//! Test effect backends and observers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parley_core::effect::{BlinkParams, BlurValues, EffectBackend, EffectObserver, EffectRequest};
use tokio::sync::Semaphore;

use crate::timeline::Timeline;

/// A backend that logs every operation to a `Timeline` and takes a fixed
/// (virtual) time per blink.
///
/// Entries: `blink:start`, `blink:end`, `blink_with_blur:start`,
/// `blink_with_blur:end`, `blur_start`, `blur_end`,
/// `blur_values:<start>:<end>`, `reset`.
#[derive(Debug)]
pub struct ScriptedEffectBackend {
    timeline: Timeline,
    blink_duration: Duration,
}

impl ScriptedEffectBackend {
    #[must_use]
    pub fn new(timeline: Timeline, blink_duration: Duration) -> Self {
        Self {
            timeline,
            blink_duration,
        }
    }
}

#[async_trait]
impl EffectBackend for ScriptedEffectBackend {
    fn apply_start_blur(&self) {
        self.timeline.push("blur_start");
    }

    fn apply_end_blur(&self) {
        self.timeline.push("blur_end");
    }

    fn set_blur_values(&self, values: BlurValues) {
        self.timeline
            .push(format!("blur_values:{}:{}", values.start, values.end));
    }

    async fn blink(&self, params: BlinkParams) {
        self.timeline.push("blink:start");
        tokio::time::sleep(self.blink_duration * params.count).await;
        self.timeline.push("blink:end");
    }

    async fn blink_with_blur(&self, params: BlinkParams) {
        self.timeline.push("blink_with_blur:start");
        tokio::time::sleep(self.blink_duration * params.count).await;
        self.timeline.push("blink_with_blur:end");
    }

    fn reset_all_effects(&self) {
        self.timeline.push("reset");
    }
}

/// A backend whose blinks only finish when the test releases them, one
/// permit per blink. Instantaneous effects complete immediately.
#[derive(Debug)]
pub struct GatedEffectBackend {
    gate: Semaphore,
    started: AtomicUsize,
    finished: AtomicUsize,
}

impl GatedEffectBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        }
    }

    /// Lets one waiting (or future) blink finish.
    pub fn release_one(&self) {
        self.gate.add_permits(1);
    }

    /// Number of blinks that have started.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Number of blinks that have finished.
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    async fn wait_for_release(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
        // The semaphore is never closed.
        if let Ok(permit) = self.gate.acquire().await {
            permit.forget();
        }
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for GatedEffectBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EffectBackend for GatedEffectBackend {
    fn apply_start_blur(&self) {}

    fn apply_end_blur(&self) {}

    fn set_blur_values(&self, _values: BlurValues) {}

    async fn blink(&self, _params: BlinkParams) {
        self.wait_for_release().await;
    }

    async fn blink_with_blur(&self, _params: BlinkParams) {
        self.wait_for_release().await;
    }

    fn reset_all_effects(&self) {}
}

/// A backend whose blinks panic. Instantaneous effects are logged to a
/// `Timeline` like `ScriptedEffectBackend` does.
#[derive(Debug)]
pub struct PanickingEffectBackend {
    timeline: Timeline,
}

impl PanickingEffectBackend {
    #[must_use]
    pub fn new(timeline: Timeline) -> Self {
        Self { timeline }
    }
}

#[async_trait]
impl EffectBackend for PanickingEffectBackend {
    fn apply_start_blur(&self) {
        self.timeline.push("blur_start");
    }

    fn apply_end_blur(&self) {
        self.timeline.push("blur_end");
    }

    fn set_blur_values(&self, _values: BlurValues) {}

    async fn blink(&self, _params: BlinkParams) {
        panic!("blink renderer lost");
    }

    async fn blink_with_blur(&self, _params: BlinkParams) {
        panic!("blink renderer lost");
    }

    fn reset_all_effects(&self) {
        self.timeline.push("reset");
    }
}

/// An observer that logs `started:<branch_id>` and `completed:<branch_id>`
/// to a `Timeline`.
#[derive(Debug)]
pub struct RecordingObserver {
    timeline: Timeline,
}

impl RecordingObserver {
    #[must_use]
    pub fn new(timeline: Timeline) -> Self {
        Self { timeline }
    }
}

impl EffectObserver for RecordingObserver {
    fn effect_started(&self, request: &EffectRequest) {
        self.timeline.push(format!("started:{}", request.branch_id));
    }

    fn effect_completed(&self, request: &EffectRequest) {
        self.timeline.push(format!("completed:{}", request.branch_id));
    }
}
