//! Effect requests and the backend that plays them.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::clock::Clock;

/// The effect a request asks the backend to perform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Run N fade-in/fade-out cycles.
    Blink,
    /// Set blur to the start intensity.
    BlurStart,
    /// Set blur to the end intensity.
    BlurEnd,
    /// Blur, blink, then smoothly restore the original blur.
    BlinkWithBlur,
    /// Stop any blink and restore default blur.
    Reset,
    /// A type name no backend operation matches.
    Unknown(String),
}

impl EffectKind {
    /// Parses an effect type name, ignoring ASCII case.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "blink" => Self::Blink,
            "blur_start" => Self::BlurStart,
            "blur_end" => Self::BlurEnd,
            "blink_with_blur" => Self::BlinkWithBlur,
            "reset" => Self::Reset,
            _ => Self::Unknown(name.to_owned()),
        }
    }

    /// The canonical type name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Blink => "blink",
            Self::BlurStart => "blur_start",
            Self::BlurEnd => "blur_end",
            Self::BlinkWithBlur => "blink_with_blur",
            Self::Reset => "reset",
            Self::Unknown(name) => name,
        }
    }

    /// Returns true for effects that take time and hide the UI while
    /// playing.
    #[must_use]
    pub fn is_timed(&self) -> bool {
        matches!(self, Self::Blink | Self::BlinkWithBlur)
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blink cycle parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkParams {
    /// Number of fade-in/fade-out cycles, at least 1.
    pub count: u32,
    /// Hold time factor for each cycle, positive.
    pub speed: f32,
}

impl Default for BlinkParams {
    fn default() -> Self {
        Self {
            count: 3,
            speed: 0.8,
        }
    }
}

/// Custom blur intensities applied before a blur effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurValues {
    pub start: f32,
    pub end: f32,
}

/// A queued effect.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectRequest {
    /// Unique request identifier.
    pub id: Uuid,
    /// Branch whose transition asked for the effect.
    pub branch_id: String,
    pub kind: EffectKind,
    pub blink: BlinkParams,
    /// Overrides the backend's blur intensities when set.
    pub blur: Option<BlurValues>,
    /// When the request entered the queue.
    pub enqueued_at: DateTime<Utc>,
}

impl EffectRequest {
    /// Creates a request with default blink parameters.
    #[must_use]
    pub fn new(branch_id: impl Into<String>, kind: EffectKind, clock: &dyn Clock) -> Self {
        Self {
            id: Uuid::new_v4(),
            branch_id: branch_id.into(),
            kind,
            blink: BlinkParams::default(),
            blur: None,
            enqueued_at: clock.now(),
        }
    }

    #[must_use]
    pub fn with_blink(mut self, blink: BlinkParams) -> Self {
        self.blink = blink;
        self
    }

    #[must_use]
    pub fn with_blur(mut self, blur: BlurValues) -> Self {
        self.blur = Some(blur);
        self
    }
}

/// Result delivered to whoever awaits a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectReport {
    pub request_id: Uuid,
    /// False when no backend was available or the type was unknown.
    pub executed: bool,
}

/// Screen-space effect implementation provided by the host.
///
/// Async methods return once the effect has finished; that return is the
/// completion signal the queue waits on.
#[async_trait]
pub trait EffectBackend: Send + Sync {
    /// Sets blur to the start intensity immediately.
    fn apply_start_blur(&self);

    /// Sets blur to the end intensity immediately.
    fn apply_end_blur(&self);

    /// Replaces the start/end blur intensities.
    fn set_blur_values(&self, values: BlurValues);

    /// Plays blink cycles.
    async fn blink(&self, params: BlinkParams);

    /// Applies blur, plays blink cycles, then restores the original blur.
    async fn blink_with_blur(&self, params: BlinkParams);

    /// Stops any in-flight blink and restores default blur.
    fn reset_all_effects(&self);
}

/// Listener notified around timed effects.
pub trait EffectObserver: Send + Sync {
    fn effect_started(&self, request: &EffectRequest);

    fn effect_completed(&self, request: &EffectRequest);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!(EffectKind::parse("BLINK"), EffectKind::Blink);
        assert_eq!(EffectKind::parse("Blink_With_Blur"), EffectKind::BlinkWithBlur);
        assert_eq!(EffectKind::parse("reset"), EffectKind::Reset);
    }

    #[test]
    fn test_parse_keeps_unknown_name() {
        let kind = EffectKind::parse("Shake");

        assert_eq!(kind, EffectKind::Unknown("Shake".to_owned()));
        assert_eq!(kind.to_string(), "Shake");
    }

    #[test]
    fn test_only_blinks_are_timed() {
        assert!(EffectKind::Blink.is_timed());
        assert!(EffectKind::BlinkWithBlur.is_timed());
        assert!(!EffectKind::BlurStart.is_timed());
        assert!(!EffectKind::Reset.is_timed());
    }
}
