// 3rd party crates
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid log level: {0}. Must be one of: error, warn, info, debug, trace")]
    InvalidLogLevel(String),
    #[error("Username is required and must be a non-empty string")]
    MissingUsername,
    #[error("Token is required and must be a non-empty string")]
    MissingToken,
    #[error("{field} must be greater than 0, got {value}")]
    InvalidRateLimit { field: &'static str, value: u32 },
    #[error("Timeout must be greater than 0, got {0}")]
    InvalidTimeout(u64),
    #[error("Base URL must not be empty")]
    MissingBaseUrl,
}
