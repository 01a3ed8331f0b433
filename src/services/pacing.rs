use std::time::Duration;

use governor::{
    Quota, RateLimiter, clock::DefaultClock, state::InMemoryState, state::direct::NotKeyed,
};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Delay between catalog searches used when none is configured.
pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_millis(500);

/// Spaces out requests to the catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Pacer: Send + Sync {
    /// Resolves once the next request may be sent.
    async fn wait(&self);
}

/// Allows one request per `interval`, the first one immediately.
pub struct IntervalPacer {
    interval: Duration,
    limiter: Option<DirectRateLimiter>,
}

impl IntervalPacer {
    /// A zero interval disables pacing.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            limiter: Quota::with_period(interval).map(RateLimiter::direct),
        }
    }
}

#[async_trait::async_trait]
impl Pacer for IntervalPacer {
    async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            log::trace!("Waiting for catalog rate limiter ({:?})", self.interval);
            limiter.until_ready().await;
        }
    }
}
