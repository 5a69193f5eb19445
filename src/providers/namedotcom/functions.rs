// 3rd party crates
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use tracing::error;

// Project imports
use crate::settings::types::ProviderSettings;

// Current module imports
use super::constants::USER_AGENT;
use super::errors::NameDotComError;

/// Creates a reqwest client with the appropriate headers and timeout for the Name.com API.
pub(super) fn create_reqwest_client(settings: &ProviderSettings) -> Result<Client, NameDotComError> {
    if settings.username.trim().is_empty() {
        error!("API username is not set");
        return Err(NameDotComError::MissingUsername);
    }

    if settings.token.trim().is_empty() {
        error!(username = %settings.username, "API token is not set");
        return Err(NameDotComError::MissingToken);
    }

    let mut headers: HeaderMap = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

    let client: Client = Client::builder()
        .default_headers(headers)
        .user_agent(USER_AGENT)
        .timeout(settings.get_timeout())
        .build()
        .map_err(|e| {
            error!(username = %settings.username, "Failed to build HTTP client: {}", e);
            NameDotComError::HttpClientBuild(e)
        })?;

    Ok(client)
}
