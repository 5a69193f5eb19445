// 3rd party crates
use reqwest::StatusCode;
use thiserror::Error;

// Project imports
use crate::utility::context::WaitError;
use crate::utility::rate_limiter::errors::RateLimitError;

/// Custom error type for Name.com operations.
#[derive(Debug, Error)]
pub enum NameDotComError {
    #[error("API username is not set")]
    MissingUsername,

    #[error("API token is not set")]
    MissingToken,

    #[error("HTTP client error: {0}")]
    HttpClientBuild(#[source] reqwest::Error),

    #[error(transparent)]
    RateLimit(#[from] RateLimitError),

    #[error("Request to '{path}' was abandoned: {cause}")]
    Cancelled { path: String, cause: WaitError },

    #[error("Invalid API credentials for user '{0}'")]
    Unauthorized(String),

    #[error("Request to '{path}' failed: {message}")]
    RequestFailed { path: String, message: String },

    #[error("HTTP {status} from '{path}': {body}")]
    Status {
        path: String,
        status: StatusCode,
        body: String,
    },
}
