//! Mapping from authored branch effect settings to queued requests.

use parley_core::clock::Clock;
use parley_core::config::DialogueConfig;
use parley_core::effect::{BlinkParams, BlurValues, EffectKind, EffectRequest};
use parley_graph::{EffectSettings, EffectType};
use tracing::warn;

/// Which side of a branch an effect belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectMoment {
    /// Before the branch's first line.
    Start,
    /// After the branch is left.
    End,
}

/// Builds the request for `branch_id`'s effect at `moment`.
///
/// Blur effects map to `blur_start` on branch start and `blur_end` on
/// branch end. Out-of-range blink parameters fall back to `config`.
#[must_use]
pub fn request_for_branch(
    branch_id: &str,
    settings: &EffectSettings,
    moment: EffectMoment,
    config: &DialogueConfig,
    clock: &dyn Clock,
) -> EffectRequest {
    let kind = match (settings.effect_type, moment) {
        (EffectType::Blink, _) => EffectKind::Blink,
        (EffectType::BlinkWithBlur, _) => EffectKind::BlinkWithBlur,
        (EffectType::Blur | EffectType::CustomBlur, EffectMoment::Start) => EffectKind::BlurStart,
        (EffectType::Blur | EffectType::CustomBlur, EffectMoment::End) => EffectKind::BlurEnd,
    };

    let count = if settings.blink_count == 0 {
        warn!(branch_id, "blink_count below 1; using configured default");
        config.blink_count
    } else {
        settings.blink_count
    };
    let speed = if settings.blink_speed > 0.0 {
        settings.blink_speed
    } else {
        warn!(branch_id, "blink_speed not positive; using configured default");
        config.blink_speed
    };

    let request = EffectRequest::new(branch_id, kind, clock).with_blink(BlinkParams { count, speed });
    if settings.effect_type == EffectType::CustomBlur {
        request.with_blur(BlurValues {
            start: settings.blur_start,
            end: settings.blur_end,
        })
    } else {
        request
    }
}

#[cfg(test)]
mod tests {
    use parley_test_support::FixedClock;

    use super::*;

    #[test]
    fn test_blur_maps_by_moment() {
        let clock = FixedClock::reference();
        let config = DialogueConfig::default();
        let settings = EffectSettings::on_start(EffectType::Blur);

        let start = request_for_branch("A", &settings, EffectMoment::Start, &config, &clock);
        let end = request_for_branch("A", &settings, EffectMoment::End, &config, &clock);

        assert_eq!(start.kind, EffectKind::BlurStart);
        assert_eq!(end.kind, EffectKind::BlurEnd);
        assert_eq!(start.blur, None);
        assert_eq!(start.enqueued_at, clock.0);
    }

    #[test]
    fn test_custom_blur_carries_authored_intensities() {
        // Arrange
        let clock = FixedClock::reference();
        let mut settings = EffectSettings::on_start(EffectType::CustomBlur);
        settings.blur_start = 0.5;
        settings.blur_end = 2.0;

        // Act
        let request = request_for_branch(
            "A",
            &settings,
            EffectMoment::Start,
            &DialogueConfig::default(),
            &clock,
        );

        // Assert
        assert_eq!(request.kind, EffectKind::BlurStart);
        assert_eq!(request.blur, Some(BlurValues { start: 0.5, end: 2.0 }));
    }

    #[test]
    fn test_out_of_range_blink_parameters_fall_back_to_config() {
        // Arrange
        let clock = FixedClock::reference();
        let config = DialogueConfig {
            blink_count: 4,
            blink_speed: 1.25,
            ..DialogueConfig::default()
        };
        let mut settings = EffectSettings::on_start(EffectType::Blink);
        settings.blink_count = 0;
        settings.blink_speed = -1.0;

        // Act
        let request = request_for_branch("A", &settings, EffectMoment::Start, &config, &clock);

        // Assert
        assert_eq!(request.kind, EffectKind::Blink);
        assert_eq!(request.blink, BlinkParams { count: 4, speed: 1.25 });
    }
}
