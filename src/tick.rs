use std::time::Duration;

use crate::config::{BASE_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS, TICK_DECAY_PER_POINT_MS};

/// Linear speed-up of the tick timer as the score grows.
///
/// Owned by the shell; the engine has no notion of time.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TickSchedule {
    pub base: Duration,
    pub decay_per_point: Duration,
    pub min: Duration,
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(BASE_TICK_INTERVAL_MS),
            decay_per_point: Duration::from_millis(TICK_DECAY_PER_POINT_MS),
            min: Duration::from_millis(MIN_TICK_INTERVAL_MS),
        }
    }
}

impl TickSchedule {
    /// `max(base - score * decay_per_point, min)`.
    #[must_use]
    pub fn interval_for_score(&self, score: u32) -> Duration {
        let decay = self.decay_per_point.saturating_mul(score);
        self.base.saturating_sub(decay).max(self.min)
    }
}
