// Standard library
use std::sync::Arc;

// 3rd party crates
use tokio::sync::Mutex;
use tokio::time::Instant;

// Current module imports
use super::traits::RateLimiter;

/// Refill rate and burst ceiling of one token bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quota {
    /// Tokens accrued per second.
    pub rate: f64,
    /// Maximum number of tokens the bucket can hold.
    pub burst: u32,
}

/// Mutable part of a token bucket.
#[derive(Debug)]
pub(super) struct BucketState {
    pub(super) tokens: f64,
    pub(super) last: Instant,
}

/// A token bucket that starts full and blocks callers until a token accrues.
#[derive(Debug)]
pub struct TokenBucket {
    pub(super) name: &'static str,
    pub(super) quota: Quota,
    pub(super) state: Mutex<BucketState>,
}

/// The per-second and per-hour limiters, always replaced together.
#[derive(Clone)]
pub struct LimiterPair {
    pub per_second: Arc<dyn RateLimiter>,
    pub per_hour: Arc<dyn RateLimiter>,
}

/// Both limiters behind one lock; `None` until configured or first used.
pub struct DualRateLimiter {
    pub(super) limiters: Mutex<Option<LimiterPair>>,
}

/// Process-wide handle to a [`DualRateLimiter`], cheap to clone into call sites.
#[derive(Clone)]
pub struct SharedRateLimiter(pub(super) Arc<DualRateLimiter>);
