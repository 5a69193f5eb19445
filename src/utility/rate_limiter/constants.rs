/// Requests per second installed when nothing was configured before first use.
pub const DEFAULT_PER_SECOND_LIMIT: u32 = 20;
/// Requests per hour installed when nothing was configured before first use.
pub const DEFAULT_PER_HOUR_LIMIT: u32 = 3000;

/// The hourly bucket may burst up to a tenth of the hourly limit.
pub const HOURLY_BURST_DIVISOR: u32 = 10;
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Smallest burst a derived quota is allowed to have.
pub const MIN_BURST: u32 = 1;

pub const PER_SECOND_LIMITER: &str = "per-second";
pub const PER_HOUR_LIMITER: &str = "per-hour";
