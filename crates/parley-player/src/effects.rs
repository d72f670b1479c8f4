//! Effect backend that logs effects and waits out their duration.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use parley_core::effect::{BlinkParams, BlurValues, EffectBackend};
use tracing::info;

/// Logs every effect instead of rendering it. Blinks take `speed` seconds
/// per cycle.
#[derive(Debug)]
pub struct ConsoleEffectBackend {
    defaults: BlurValues,
    blur: Mutex<BlurValues>,
}

impl ConsoleEffectBackend {
    /// Creates a backend whose reset restores `defaults`.
    #[must_use]
    pub fn new(defaults: BlurValues) -> Self {
        Self {
            defaults,
            blur: Mutex::new(defaults),
        }
    }

    fn blur(&self) -> BlurValues {
        *self.blur.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Time taken by `params.count` blink cycles.
    #[must_use]
    pub fn blink_duration(params: BlinkParams) -> Duration {
        Duration::try_from_secs_f32(params.speed.max(0.0)).unwrap_or(Duration::ZERO) * params.count
    }
}

#[async_trait]
impl EffectBackend for ConsoleEffectBackend {
    fn apply_start_blur(&self) {
        info!(intensity = self.blur().start, "blur set");
    }

    fn apply_end_blur(&self) {
        info!(intensity = self.blur().end, "blur set");
    }

    fn set_blur_values(&self, values: BlurValues) {
        *self.blur.lock().unwrap_or_else(PoisonError::into_inner) = values;
    }

    async fn blink(&self, params: BlinkParams) {
        info!(count = params.count, speed = params.speed, "blink");
        tokio::time::sleep(Self::blink_duration(params)).await;
    }

    async fn blink_with_blur(&self, params: BlinkParams) {
        let blur = self.blur();
        info!(intensity = blur.end, "blur set");
        self.blink(params).await;
        info!(intensity = blur.start, "blur restored");
    }

    fn reset_all_effects(&self) {
        self.set_blur_values(self.defaults);
        info!(intensity = self.defaults.start, "effects reset");
    }
}
