// Standard library
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// 3rd party crates
use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

// Project imports
use crate::utility::context::{RequestContext, WaitError};

// Current module imports
use super::constants::{
    DEFAULT_PER_HOUR_LIMIT, DEFAULT_PER_SECOND_LIMIT, HOURLY_BURST_DIVISOR, MIN_BURST,
    PER_HOUR_LIMITER, PER_SECOND_LIMITER, SECONDS_PER_HOUR,
};
use super::errors::RateLimitError;
use super::traits::RateLimiter;
use super::types::{
    BucketState, DualRateLimiter, LimiterPair, Quota, SharedRateLimiter, TokenBucket,
};

impl Quota {
    pub fn new(rate: f64, burst: u32) -> Self {
        Self { rate, burst }
    }

    /// A full second's worth of requests may be spent at once.
    pub fn per_second(limit: u32) -> Self {
        Self::new(f64::from(limit), limit)
    }

    /// Spreads `limit` over an hour, with a burst of a tenth of the limit.
    pub fn per_hour(limit: u32) -> Self {
        Self::new(
            f64::from(limit) / SECONDS_PER_HOUR,
            (limit / HOURLY_BURST_DIVISOR).max(MIN_BURST),
        )
    }

    /// Time needed to accrue `deficit` tokens, or `None` if they never will.
    fn time_to_accrue(&self, deficit: f64) -> Option<Duration> {
        if self.burst == 0 || self.rate <= 0.0 || !self.rate.is_finite() {
            return None;
        }
        Duration::try_from_secs_f64(deficit / self.rate).ok()
    }
}

impl TokenBucket {
    pub fn new(name: &'static str, quota: Quota) -> Self {
        Self {
            name,
            quota,
            state: Mutex::new(BucketState {
                tokens: f64::from(quota.burst),
                last: Instant::now(),
            }),
        }
    }

    fn refill(&self, state: &mut BucketState, now: Instant) {
        let elapsed = now.saturating_duration_since(state.last).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.quota.rate).min(f64::from(self.quota.burst));
        state.last = now;
    }

    /// Takes a token if one is available, otherwise reports how long until one is.
    async fn try_take(&self) -> Result<(), Option<Duration>> {
        let mut state = self.state.lock().await;
        self.refill(&mut state, Instant::now());

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            return Ok(());
        }

        Err(self.quota.time_to_accrue(1.0 - state.tokens))
    }

    /// Tokens currently in the bucket.
    pub async fn available(&self) -> f64 {
        let mut state = self.state.lock().await;
        self.refill(&mut state, Instant::now());
        state.tokens
    }
}

#[async_trait]
impl RateLimiter for TokenBucket {
    async fn wait(&self, ctx: &RequestContext) -> Result<(), WaitError> {
        if let Some(err) = ctx.err() {
            return Err(err);
        }

        loop {
            let delay = match self.try_take().await {
                Ok(()) => return Ok(()),
                Err(delay) => delay,
            };

            if let Some(deadline) = ctx.deadline() {
                let ready = delay.and_then(|delay| Instant::now().checked_add(delay));
                if ready.map_or(true, |ready| ready > deadline) {
                    return Err(WaitError::WouldExceedDeadline);
                }
            }

            let Some(delay) = delay else {
                debug!(limiter = self.name, "Quota never refills, waiting for cancellation");
                return Err(ctx.done().await);
            };

            debug!(
                limiter = self.name,
                wait_ms = wait_millis(delay),
                "Waiting for rate limiter token"
            );

            tokio::select! {
                biased;
                err = ctx.done() => return Err(err),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    fn quota(&self) -> Quota {
        self.quota
    }
}

/// Whole milliseconds in `delay`, saturating for delays that overflow `u64`.
fn wait_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

impl LimiterPair {
    pub fn new(per_second: Quota, per_hour: Quota) -> Self {
        Self {
            per_second: Arc::new(TokenBucket::new(PER_SECOND_LIMITER, per_second)),
            per_hour: Arc::new(TokenBucket::new(PER_HOUR_LIMITER, per_hour)),
        }
    }

    pub fn from_limits(per_second: u32, per_hour: u32) -> Self {
        Self::new(Quota::per_second(per_second), Quota::per_hour(per_hour))
    }

    pub fn defaults() -> Self {
        Self::from_limits(DEFAULT_PER_SECOND_LIMIT, DEFAULT_PER_HOUR_LIMIT)
    }
}

impl DualRateLimiter {
    /// Creates a limiter that installs the default quotas on first use.
    pub fn new() -> Self {
        Self {
            limiters: Mutex::new(None),
        }
    }

    /// Creates a limiter with explicit quotas instead of derived ones.
    pub fn with_quotas(per_second: Quota, per_hour: Quota) -> Self {
        Self {
            limiters: Mutex::new(Some(LimiterPair::new(per_second, per_hour))),
        }
    }

    /// Replaces both limiters with fresh ones derived from the given limits.
    ///
    /// Limits are expected to be positive; settings validation rejects zero
    /// before they get here.
    pub async fn configure(&self, per_second: u32, per_hour: u32) {
        let pair = LimiterPair::from_limits(per_second, per_hour);
        *self.limiters.lock().await = Some(pair);
        info!(per_second, per_hour, "Rate limiters configured");
    }

    /// Returns the installed pair, installing the defaults if there is none.
    async fn current(&self) -> LimiterPair {
        let mut limiters = self.limiters.lock().await;
        limiters
            .get_or_insert_with(|| {
                debug!(
                    per_second = DEFAULT_PER_SECOND_LIMIT,
                    per_hour = DEFAULT_PER_HOUR_LIMIT,
                    "Rate limiters not configured, installing defaults"
                );
                LimiterPair::defaults()
            })
            .clone()
    }

    /// Waits until both quotas admit one more request.
    ///
    /// The per-second quota is waited on first. If that wait fails, the
    /// per-hour quota is left untouched.
    pub async fn acquire(&self, ctx: &RequestContext) -> Result<(), RateLimitError> {
        let pair = self.current().await;

        pair.per_second.wait(ctx).await.map_err(|e| {
            warn!(limiter = PER_SECOND_LIMITER, error = %e, "Rate limiter wait failed");
            RateLimitError::PerSecond(e)
        })?;

        pair.per_hour.wait(ctx).await.map_err(|e| {
            warn!(limiter = PER_HOUR_LIMITER, error = %e, "Rate limiter wait failed");
            RateLimitError::PerHour(e)
        })?;

        Ok(())
    }

    pub async fn is_initialized(&self) -> bool {
        self.limiters.lock().await.is_some()
    }

    /// The installed `(per_second, per_hour)` quotas, if any.
    pub async fn quotas(&self) -> Option<(Quota, Quota)> {
        self.limiters
            .lock()
            .await
            .as_ref()
            .map(|pair| (pair.per_second.quota(), pair.per_hour.quota()))
    }
}

impl Default for DualRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SharedRateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRateLimiter")
            .field("inner", &"<DualRateLimiter>")
            .finish()
    }
}

impl SharedRateLimiter {
    pub fn new() -> Self {
        Self(Arc::new(DualRateLimiter::new()))
    }

    pub fn with_quotas(per_second: Quota, per_hour: Quota) -> Self {
        Self(Arc::new(DualRateLimiter::with_quotas(per_second, per_hour)))
    }

    pub async fn configure(&self, per_second: u32, per_hour: u32) {
        self.0.configure(per_second, per_hour).await;
    }

    pub async fn acquire(&self, ctx: &RequestContext) -> Result<(), RateLimitError> {
        self.0.acquire(ctx).await
    }

    pub async fn is_initialized(&self) -> bool {
        self.0.is_initialized().await
    }

    pub async fn quotas(&self) -> Option<(Quota, Quota)> {
        self.0.quotas().await
    }
}

impl Default for SharedRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
