// Standard library
use std::fmt;
use std::future::Future;

// 3rd party crates
use reqwest::StatusCode;
use tracing::{debug, info, warn};

// Project imports
use crate::settings::types::ProviderSettings;
use crate::utility::context::RequestContext;
use crate::utility::rate_limiter::types::SharedRateLimiter;

// Current module imports
use super::constants::HELLO_PATH;
use super::errors::NameDotComError;
use super::functions::create_reqwest_client;
use super::types::{HelloResponse, NameDotCom};

impl NameDotCom {
    /// Builds a client that shares `limiter` with every other call site.
    pub fn new(
        settings: &ProviderSettings,
        limiter: SharedRateLimiter,
    ) -> Result<Self, NameDotComError> {
        let client = create_reqwest_client(settings)?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            username: settings.username.clone(),
            token: settings.token.clone(),
            limiter,
        })
    }

    /// Waits for both rate limiters, then runs `request` unless `ctx` finishes first.
    pub async fn with_rate_limit<T, F>(
        &self,
        ctx: &RequestContext,
        path: &str,
        request: F,
    ) -> Result<T, NameDotComError>
    where
        F: Future<Output = Result<T, NameDotComError>>,
    {
        self.limiter.acquire(ctx).await?;

        debug!(path = %path, "Sending API request");

        tokio::select! {
            biased;
            cause = ctx.done() => {
                warn!(path = %path, error = %cause, "API request abandoned");
                Err(NameDotComError::Cancelled {
                    path: path.to_string(),
                    cause,
                })
            }
            result = request => result,
        }
    }

    /// Checks connectivity and credentials against the `hello` endpoint.
    pub async fn hello(&self, ctx: &RequestContext) -> Result<HelloResponse, NameDotComError> {
        let url = format!("{}{}", self.base_url, HELLO_PATH);

        let hello = self
            .with_rate_limit(ctx, HELLO_PATH, async {
                let response = self
                    .client
                    .get(&url)
                    .basic_auth(&self.username, Some(&self.token))
                    .send()
                    .await
                    .map_err(|e| NameDotComError::RequestFailed {
                        path: HELLO_PATH.to_string(),
                        message: format!("Failed to send request: {}", e),
                    })?;

                let status = response.status();
                if status == StatusCode::UNAUTHORIZED {
                    return Err(NameDotComError::Unauthorized(self.username.clone()));
                }

                if !status.is_success() {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    return Err(NameDotComError::Status {
                        path: HELLO_PATH.to_string(),
                        status,
                        body,
                    });
                }

                response
                    .json::<HelloResponse>()
                    .await
                    .map_err(|e| NameDotComError::RequestFailed {
                        path: HELLO_PATH.to_string(),
                        message: format!("Failed to parse response: {}", e),
                    })
            })
            .await?;

        info!(
            server = %hello.server_name,
            username = %hello.username,
            "Connected to Name.com API"
        );

        Ok(hello)
    }
}

impl fmt::Debug for NameDotCom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameDotCom")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .field("limiter", &self.limiter)
            .finish()
    }
}
