//! Name.com registrar API access gated by a shared dual-window rate limiter.

pub mod providers;
pub mod settings;
pub mod utility;
