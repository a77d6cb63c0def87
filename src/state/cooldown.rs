//! Minimum re-command interval tracking

use std::time::{Duration, Instant};

/// Remembers when an action last happened and whether enough time has
/// passed to allow another one.
///
/// A timer that has never been restarted is always ready, so the very
/// first action is never delayed.
#[derive(Debug, Clone, Copy)]
pub struct CooldownTimer {
    last_commanded_at: Option<Instant>,
    min_interval: Duration,
}

impl CooldownTimer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_commanded_at: None,
            min_interval,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn last_commanded_at(&self) -> Option<Instant> {
        self.last_commanded_at
    }

    /// At least `min_interval` has elapsed since the last restart
    pub fn is_ready(&self, now: Instant) -> bool {
        match self.last_commanded_at {
            None => true,
            Some(at) => now.saturating_duration_since(at) >= self.min_interval,
        }
    }

    /// Strictly more than `min_interval` has elapsed since the last restart
    pub fn has_expired(&self, now: Instant) -> bool {
        match self.last_commanded_at {
            None => true,
            Some(at) => now.saturating_duration_since(at) > self.min_interval,
        }
    }

    pub fn restart(&mut self, now: Instant) {
        self.last_commanded_at = Some(now);
    }
}
