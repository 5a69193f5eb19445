//! Rate-limited access to the Name.com v4 API.
//!
//! Every request goes through [`types::NameDotCom::with_rate_limit`], which
//! waits on the shared dual-window limiter before anything is sent and
//! abandons the request once the caller's context is done.

pub mod constants;
pub mod errors;
pub mod functions;
pub mod impls;
pub mod types;
