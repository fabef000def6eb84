use tokio::time::{interval, Duration};

use crate::limiter::rate_limiter::{Clock, FixedWindowLimiter};

/// Periodically drops rate-limit records whose window has elapsed so the
/// table only holds callers seen within the last window.
pub async fn start_eviction_task<C: Clock + Clone>(limiter: FixedWindowLimiter<C>, every: Duration) {
    let mut interval = interval(every);

    loop {
        interval.tick().await;

        let evicted = limiter.evict_expired();
        if evicted > 0 {
            tracing::debug!(
                evicted,
                remaining = limiter.tracked_clients(),
                "Evicted expired rate-limit records"
            );
        }
    }
}
