//! Dual-window rate limiting for outbound registrar API calls.
//!
//! Every request first waits on a per-second bucket and then on a per-hour
//! bucket. Both buckets live in a single [`SharedRateLimiter`] that is
//! configured once at startup and cloned into every call site. If no
//! configuration happened before the first call, the default quotas
//! (20 per second, 3000 per hour) are installed on the spot.
//!
//! # Example
//!
//! ```rust,no_run
//! use namedotcom_provider::utility::context::RequestContext;
//! use namedotcom_provider::utility::rate_limiter::types::SharedRateLimiter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let limiter = SharedRateLimiter::new();
//! limiter.configure(10, 500).await;
//!
//! let ctx = RequestContext::with_timeout(std::time::Duration::from_secs(30));
//! limiter.acquire(&ctx).await?;
//! // issue the API request here
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod errors;
pub mod impls;
pub mod traits;
pub mod types;
