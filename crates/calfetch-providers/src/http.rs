//! Shared HTTP plumbing for the provider adapters.
//!
//! Each adapter builds its own [`reqwest::Client`] from [`HttpSettings`] and
//! goes through [`get_json`] for its single authenticated fetch.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::error::{ProviderError, ProviderResult};
use crate::oauth::AccessToken;

/// Longest slice of a response body quoted in an error message.
const BODY_SNIPPET_LEN: usize = 300;

/// Transport settings shared by every adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for API requests.
    pub user_agent: String,
}

impl HttpSettings {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builds the HTTP client.
    pub fn build_client(&self) -> ProviderResult<Client> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("calfetch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Sends a request and reads the whole body as text.
pub(crate) async fn send(request: RequestBuilder, what: &str) -> ProviderResult<(StatusCode, String)> {
    let response = request.send().await.map_err(|e| {
        let message = if e.is_timeout() {
            format!("{} request timed out", what)
        } else if e.is_connect() {
            format!("{} connection failed: {}", what, e)
        } else {
            format!("{} request failed: {}", what, e)
        };
        ProviderError::network(message).with_source(e)
    })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| {
        ProviderError::network(format!("failed to read {} response: {}", what, e)).with_source(e)
    })?;

    trace!("{} answered {} ({} bytes)", what, status, body.len());
    Ok((status, body))
}

/// Performs one authenticated GET and decodes the JSON body.
///
/// `what` names the resource (`events`, `meetings`) in logs and errors.
/// A non-success status is reported as a fetch failure; a body that does not
/// decode into `T` as an invalid response.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    what: &str,
    url: &str,
    token: &AccessToken,
    query: &[(&str, String)],
) -> ProviderResult<T> {
    let mut request = client
        .get(url)
        .bearer_auth(token.as_str())
        .header(ACCEPT, "application/json");

    if !query.is_empty() {
        request = request.query(query);
    }

    debug!("GET {} ({})", url, what);
    let (status, body) = send(request, what).await?;

    if !status.is_success() {
        return Err(ProviderError::fetch(format!(
            "{} request to {} failed ({}): {}",
            what,
            url,
            status,
            snippet(&body)
        ))
        .with_status(status.as_u16()));
    }

    decode(&body)
}

/// Decodes a JSON body into `T`.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> ProviderResult<T> {
    serde_json::from_str(body).map_err(|e| {
        ProviderError::invalid_response(format!("unexpected response body: {}", e)).with_source(e)
    })
}

/// Shortens a response body for inclusion in an error message.
pub(crate) fn snippet(body: &str) -> &str {
    let body = body.trim();
    if body.len() <= BODY_SNIPPET_LEN {
        return body;
    }
    let mut end = BODY_SNIPPET_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
