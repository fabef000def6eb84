use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};

use crate::{entities::rate_limit::RateLimitRecord, repositories::rate_limit::RateLimiter};

/// Monotonic time source for the limiter.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// --- Fixed window limiter ---
type Key = String;

/// Fixed-window counter keyed by caller address.
///
/// A burst of up to twice `max_requests` can straddle a window boundary;
/// that is the accepted cost of not tracking individual timestamps.
#[derive(Clone)]
pub struct FixedWindowLimiter<C: Clock = SystemClock> {
    records: Arc<DashMap<Key, RateLimitRecord>>,
    clock: C,
    window: Duration,
    max_requests: u32,
}

impl FixedWindowLimiter<SystemClock> {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self::with_clock(window, max_requests, SystemClock)
    }
}

impl<C: Clock> FixedWindowLimiter<C> {
    pub fn with_clock(window: Duration, max_requests: u32, clock: C) -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            clock,
            window,
            max_requests,
        }
    }

    /// Counts the request against `key`'s window and reports whether it fits.
    /// A denied request leaves the record untouched.
    pub fn check(&self, key: &str) -> bool {
        let now = self.clock.now();

        // The entry guard holds the shard lock for the whole read-modify-write.
        match self.records.entry(key.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(RateLimitRecord::open(now));
                true
            }
            Entry::Occupied(mut entry) => {
                let record = entry.get_mut();
                if record.is_expired(now, self.window) {
                    *record = RateLimitRecord::open(now);
                    true
                } else if record.count >= self.max_requests {
                    false
                } else {
                    record.count += 1;
                    true
                }
            }
        }
    }

    /// Drops records whose window has already elapsed. An expired record
    /// behaves exactly like an absent one, so this never changes a verdict.
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.records.len();
        self.records.retain(|_, record| !record.is_expired(now, self.window));
        before.saturating_sub(self.records.len())
    }

    pub fn record(&self, key: &str) -> Option<RateLimitRecord> {
        self.records.get(key).map(|r| *r)
    }

    pub fn tracked_clients(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl<C: Clock> RateLimiter for FixedWindowLimiter<C> {
    async fn allow(&self, key: &str) -> bool {
        self.check(key)
    }
}
