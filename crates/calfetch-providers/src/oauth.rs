//! OAuth 2.0 token endpoint plumbing.
//!
//! All three adapters obtain their bearer token with a single form-encoded
//! POST. [`request_token`] performs that POST and applies the common rules:
//!
//! - a non-success status is an authentication failure
//! - a success body without `access_token` is an authentication failure too
//!   (Zoho answers `200 {"error": "invalid_code"}` for a spent code)
//! - the call is made exactly once, nothing is cached

use std::fmt;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::http::{self, snippet};

/// OAuth client credentials.
///
/// The secret is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    /// The OAuth client ID.
    pub client_id: String,
    /// The OAuth client secret.
    pub client_secret: String,
}

impl ClientCredentials {
    /// Creates new client credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Checks that both halves are present.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.client_id.trim().is_empty() {
            return Err("client_id is required");
        }
        if self.client_secret.trim().is_empty() {
            return Err("client_secret is required");
        }
        Ok(())
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// An opaque bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token exactly as the provider issued it.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// A successful token endpoint answer.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The bearer token.
    pub access_token: AccessToken,
    /// Refresh token, for grants that issue one.
    pub refresh_token: Option<String>,
}

/// Raw token endpoint body.
#[derive(Debug, Default, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl TokenResponse {
    /// Provider-reported error, e.g. `invalid_client: bad secret`.
    fn error_summary(&self) -> Option<String> {
        match (&self.error, &self.error_description) {
            (Some(error), Some(description)) => Some(format!("{}: {}", error, description)),
            (Some(error), None) => Some(error.clone()),
            (None, Some(description)) => Some(description.clone()),
            (None, None) => None,
        }
    }
}

/// How the client authenticates itself to the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClientAuth<'a> {
    /// Credentials are sent in the form body only.
    FormOnly,
    /// Credentials are additionally sent as HTTP Basic auth.
    Basic(&'a ClientCredentials),
}

/// POSTs a grant to a token endpoint and returns the issued token.
pub(crate) async fn request_token(
    client: &Client,
    token_url: &str,
    form: &[(&str, &str)],
    auth: ClientAuth<'_>,
) -> ProviderResult<IssuedToken> {
    let grant = form
        .iter()
        .find(|(key, _)| *key == "grant_type")
        .map(|(_, value)| *value)
        .unwrap_or("unknown");
    debug!("requesting token from {} (grant_type={})", token_url, grant);

    let mut request = client.post(token_url).form(form);
    if let ClientAuth::Basic(credentials) = auth {
        request = request.basic_auth(&credentials.client_id, Some(&credentials.client_secret));
    }

    let (status, body) = http::send(request, "token").await?;

    // Error bodies are best-effort JSON; fall back to the raw text.
    let parsed: Option<TokenResponse> = serde_json::from_str(&body).ok();

    if !status.is_success() {
        let detail = parsed
            .as_ref()
            .and_then(TokenResponse::error_summary)
            .unwrap_or_else(|| snippet(&body).to_string());
        return Err(ProviderError::authentication(format!(
            "token request failed ({}): {}",
            status, detail
        ))
        .with_status(status.as_u16()));
    }

    let response = match parsed {
        Some(response) => response,
        None => http::decode::<TokenResponse>(&body)?,
    };

    match response.access_token.as_deref() {
        Some(token) if !token.is_empty() => {
            if let Some(seconds) = response.expires_in {
                debug!("access token valid for {}s", seconds);
            }
            Ok(IssuedToken {
                access_token: AccessToken::new(token),
                refresh_token: response.refresh_token.filter(|t| !t.is_empty()),
            })
        }
        _ => {
            let detail = response
                .error_summary()
                .unwrap_or_else(|| "no access_token in response".to_string());
            Err(ProviderError::authentication(format!(
                "token request rejected: {}",
                detail
            ))
            .with_status(status.as_u16()))
        }
    }
}
