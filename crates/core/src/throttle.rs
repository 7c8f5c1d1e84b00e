//! Rate limiting for drag updates.
//!
//! Pointer-move events can arrive far faster than a frame. [`Throttle`]
//! admits at most one evaluation per interval (one frame, ~16 ms, by
//! default). It only affects how often work happens: callers keep the
//! latest rejected value and apply it when the gesture ends.

use std::time::{Duration, Instant};

/// Default minimum spacing between admitted evaluations.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true, and records `now`, if at least one interval has passed
    /// since the last admitted call. The first call is always admitted.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(prev) if now.saturating_duration_since(prev) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Forgets the last admitted call so the next one passes.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}
