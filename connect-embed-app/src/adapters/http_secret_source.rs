//! HTTP secret source.
//!
//! Asks the platform backend's account-session endpoint for a fresh client
//! secret. The endpoint answers `{"client_secret": "..."}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use connect_embed_core::error::{CoreError, CoreResult, SecretFetchError};
use connect_embed_core::traits::SecretSource;
use connect_embed_core::types::ClientSecret;

use crate::config::SecretEndpointConfig;

const LOG_TAG: &str = "secret-endpoint";
const MAX_BODY_IN_ERROR: usize = 200;

#[derive(Serialize)]
struct SessionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    account: Option<&'a str>,
}

#[derive(Deserialize)]
struct SessionResponse {
    #[serde(alias = "clientSecret")]
    client_secret: String,
}

/// `SecretSource` backed by a reqwest client
pub struct HttpSecretSource {
    client: reqwest::Client,
    endpoint: SecretEndpointConfig,
}

impl HttpSecretSource {
    pub fn new(endpoint: SecretEndpointConfig) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(endpoint.timeout_ms))
            .build()
            .map_err(|e| CoreError::ConfigError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &SecretEndpointConfig {
        &self.endpoint
    }
}

#[async_trait]
impl SecretSource for HttpSecretSource {
    async fn fetch_secret(&self) -> Result<ClientSecret, SecretFetchError> {
        log::debug!("[{LOG_TAG}] POST {}", self.endpoint.url);

        let mut request = self
            .client
            .post(&self.endpoint.url)
            .json(&SessionRequest {
                account: self.endpoint.account.as_deref(),
            });
        if let Some(token) = &self.endpoint.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error("Request failed", &e))?;

        let status = response.status().as_u16();
        log::debug!("[{LOG_TAG}] Response Status: {status}");

        let body = response
            .text()
            .await
            .map_err(|e| transport_error("Failed to read response body", &e))?;

        parse_secret_response(status, &body)
    }
}

/// Client timeouts (while connecting or reading the body) are `Timeout`
fn transport_error(context: &str, e: &reqwest::Error) -> SecretFetchError {
    if e.is_timeout() {
        SecretFetchError::Timeout(format!("{context}: {e}"))
    } else {
        SecretFetchError::Network(format!("{context}: {e}"))
    }
}

/// Map an endpoint response to a secret or a typed error
fn parse_secret_response(status: u16, body: &str) -> Result<ClientSecret, SecretFetchError> {
    match status {
        200..=299 => {}
        401 | 403 => return Err(SecretFetchError::Unauthorized(truncate_body(body))),
        429 | 500..=599 => {
            log::warn!("[{LOG_TAG}] Server error (HTTP {status})");
            return Err(SecretFetchError::Server {
                status,
                body: truncate_body(body),
            });
        }
        _ => {
            return Err(SecretFetchError::Status {
                status,
                body: truncate_body(body),
            })
        }
    }

    let parsed: SessionResponse = serde_json::from_str(body).map_err(|e| {
        log::error!("[{LOG_TAG}] JSON parse failed: {e}");
        SecretFetchError::InvalidResponse(e.to_string())
    })?;

    let secret = ClientSecret::new(parsed.client_secret);
    if secret.is_empty() {
        return Err(SecretFetchError::InvalidResponse(
            "client_secret is empty".to_string(),
        ));
    }
    Ok(secret)
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_IN_ERROR) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
