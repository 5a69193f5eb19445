// 3rd party crates
use reqwest::Client;
use serde::Deserialize;

// Project imports
use crate::utility::rate_limiter::types::SharedRateLimiter;

/// Represents a client for interacting with the Name.com API.
#[derive(Clone)]
pub struct NameDotCom {
    pub client: Client,
    pub base_url: String,
    pub username: String,
    pub(super) token: String,
    pub limiter: SharedRateLimiter,
}

/// Response of the `hello` endpoint, used to check connectivity and credentials.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelloResponse {
    pub server_name: String,
    #[serde(default)]
    pub motd: String,
    pub username: String,
    pub server_time: String,
}
