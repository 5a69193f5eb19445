// 3rd party crates
use thiserror::Error;

// Project imports
use crate::utility::context::WaitError;

/// Failure of a gated wait, tagged with the quota that was being waited on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RateLimitError {
    #[error("per-second rate limiter error: {0}")]
    PerSecond(#[source] WaitError),

    #[error("per-hour rate limiter error: {0}")]
    PerHour(#[source] WaitError),
}

impl RateLimitError {
    /// The underlying cancellation or deadline cause.
    pub fn cause(&self) -> WaitError {
        match self {
            RateLimitError::PerSecond(cause) | RateLimitError::PerHour(cause) => *cause,
        }
    }
}
