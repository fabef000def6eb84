use std::time::{Duration, Instant};

/// Per-address counter for one fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRecord {
    pub count: u32,
    pub window_start: Instant,
}

impl RateLimitRecord {
    /// A fresh window opened by the request arriving at `now`.
    pub fn open(now: Instant) -> Self {
        RateLimitRecord {
            count: 1,
            window_start: now,
        }
    }

    pub fn is_expired(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.window_start) > window
    }
}
