//! Wall-clock time for stamping effect requests.

use chrono::{DateTime, Utc};

/// Source of the `enqueued_at` stamp on effect requests.
///
/// Reveal and effect timing never read this clock; they go through the
/// async runtime's timer so tests can pause time. Any
/// `Fn() -> DateTime<Utc>` closure is a clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc> + Send + Sync,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use chrono::TimeDelta;

    use super::*;
    use crate::effect::{EffectKind, EffectRequest};

    #[test]
    fn test_closure_clock_stamps_each_request() {
        // Arrange
        let base = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
        let ticks = AtomicI64::new(0);
        let clock = || base + TimeDelta::seconds(ticks.fetch_add(1, Ordering::SeqCst));

        // Act
        let first = EffectRequest::new("A", EffectKind::Blink, &clock);
        let second = EffectRequest::new("B", EffectKind::Reset, &clock);

        // Assert
        assert_eq!(first.enqueued_at, base);
        assert_eq!(second.enqueued_at - first.enqueued_at, TimeDelta::seconds(1));
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let before = SystemClock.now();

        assert!(SystemClock.now() >= before);
    }
}
