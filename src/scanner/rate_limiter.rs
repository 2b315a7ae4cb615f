//! Rate limiting for connection attempts.
//!
//! Token bucket pacing on top of the concurrency ceiling, for targets that
//! should not see a burst of SYNs.

use governor::{Quota, RateLimiter as GovLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectLimiter = GovLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// A rate limiter for controlling scan speed.
///
/// Clones share one bucket.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<DirectLimiter>,
}

impl RateLimiter {
    /// Create a limiter allowing `rate` connection attempts per second.
    pub fn new(rate: NonZeroU32) -> Self {
        Self {
            limiter: Arc::new(GovLimiter::direct(Quota::per_second(rate))),
        }
    }

    /// Limiter for `rate` per second, or `None` when `rate` is 0 (unlimited).
    pub fn per_second(rate: u32) -> Option<Self> {
        NonZeroU32::new(rate).map(Self::new)
    }

    /// Wait until the bucket allows another attempt.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to take a token without waiting.
    #[cfg(test)]
    fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rate_means_unlimited() {
        assert!(RateLimiter::per_second(0).is_none());
        assert!(RateLimiter::per_second(50).is_some());
    }

    #[tokio::test]
    async fn test_rate_limiter_creation() {
        let limiter = RateLimiter::per_second(100).unwrap();
        assert!(limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_rate_limiter_wait() {
        let limiter = RateLimiter::per_second(1000).unwrap();
        limiter.wait().await;
    }

    #[test]
    fn test_clones_share_bucket() {
        let limiter1 = RateLimiter::per_second(1).unwrap();
        let limiter2 = limiter1.clone();

        assert!(limiter1.try_acquire());
        assert!(!limiter2.try_acquire());
    }
}
