use async_trait::async_trait;

/// Decides whether another submission from `key` fits the current window.
///
/// Denial is an ordinary outcome, not an error. Implementations backed by a
/// shared store must still answer `true`/`false`; how they degrade when the
/// store is unreachable is their own policy.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn allow(&self, key: &str) -> bool;
}
