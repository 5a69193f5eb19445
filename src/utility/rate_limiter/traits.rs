// 3rd party crates
use async_trait::async_trait;

// Project imports
use crate::utility::context::{RequestContext, WaitError};

// Current module imports
use super::types::Quota;

/// A single blocking rate limiter.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Waits until one unit of work is admitted, consuming it.
    ///
    /// Fails only when `ctx` is cancelled or its deadline cannot be met, in
    /// which case nothing is consumed.
    async fn wait(&self, ctx: &RequestContext) -> Result<(), WaitError>;

    /// The quota this limiter enforces.
    fn quota(&self) -> Quota;
}
