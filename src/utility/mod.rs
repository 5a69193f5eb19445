pub mod context;
pub mod rate_limiter;
