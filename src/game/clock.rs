//! Fixed-interval tick accounting over externally supplied frame timestamps

use std::time::Duration;

/// Turns a stream of frame timestamps into simulation ticks.
///
/// The clock owns no timer. Whoever drives the frames calls [`GameClock::advance`]
/// with a monotonic millisecond timestamp; at most one tick fires per call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameClock {
    last_tick: Option<u64>,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a frame at `timestamp_ms`.
    ///
    /// The first frame after construction or [`GameClock::reset`] only sets the
    /// baseline. After that a tick fires once `interval` has elapsed since the
    /// previous tick. When `enabled` is false frames are accepted but never tick.
    pub fn advance(&mut self, timestamp_ms: u64, interval: Duration, enabled: bool) -> bool {
        let Some(last_tick) = self.last_tick else {
            self.last_tick = Some(timestamp_ms);
            return false;
        };

        if !enabled {
            return false;
        }

        let interval_ms = interval.as_millis() as u64;
        if timestamp_ms.saturating_sub(last_tick) >= interval_ms {
            self.last_tick = Some(timestamp_ms);
            true
        } else {
            false
        }
    }

    /// Timestamp of the last tick (or the baseline frame)
    pub fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }

    /// Drop the baseline; the next frame starts counting afresh
    pub fn reset(&mut self) {
        self.last_tick = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(100);

    #[test]
    fn test_first_frame_sets_baseline() {
        let mut clock = GameClock::new();
        assert!(!clock.advance(5_000, INTERVAL, true));
        assert_eq!(clock.last_tick(), Some(5_000));
    }

    #[test]
    fn test_ticks_at_interval_boundary() {
        let mut clock = GameClock::new();
        clock.advance(0, INTERVAL, true);

        assert!(!clock.advance(16, INTERVAL, true));
        assert!(!clock.advance(99, INTERVAL, true));
        assert!(clock.advance(100, INTERVAL, true));
        assert_eq!(clock.last_tick(), Some(100));
        assert!(!clock.advance(150, INTERVAL, true));
        assert!(clock.advance(216, INTERVAL, true));
    }

    #[test]
    fn test_long_gap_fires_single_tick() {
        let mut clock = GameClock::new();
        clock.advance(0, INTERVAL, true);
        assert!(clock.advance(1_000, INTERVAL, true));
        assert!(!clock.advance(1_050, INTERVAL, true));
    }

    #[test]
    fn test_disabled_never_ticks() {
        let mut clock = GameClock::new();
        clock.advance(0, INTERVAL, true);
        assert!(!clock.advance(500, INTERVAL, false));
        assert!(!clock.advance(900, INTERVAL, false));
        assert_eq!(clock.last_tick(), Some(0));

        assert!(clock.advance(1_000, INTERVAL, true));
    }

    #[test]
    fn test_interval_read_on_every_call() {
        let mut clock = GameClock::new();
        clock.advance(0, INTERVAL, true);
        assert!(!clock.advance(60, INTERVAL, true));
        assert!(clock.advance(60, Duration::from_millis(50), true));
    }

    #[test]
    fn test_backwards_timestamp_does_not_tick() {
        let mut clock = GameClock::new();
        clock.advance(1_000, INTERVAL, true);
        assert!(!clock.advance(10, INTERVAL, true));
    }

    #[test]
    fn test_reset_clears_baseline() {
        let mut clock = GameClock::new();
        clock.advance(0, INTERVAL, true);
        clock.reset();
        assert_eq!(clock.last_tick(), None);
        assert!(!clock.advance(10_000, INTERVAL, true));
    }
}
