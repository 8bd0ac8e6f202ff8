//! Provider failures.
//!
//! A run fails at one of a few stages, and [`ProviderErrorCode`] names the
//! stage: the token endpoint refused (`AuthenticationFailed`), the resource
//! endpoint refused (`FetchFailed`), or an answer could not be read
//! (`InvalidResponse`). Transport and configuration problems get their own
//! codes so callers never confuse them with a provider's verdict.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Boxed cause attached to a [`ProviderError`].
type Cause = Box<dyn StdError + Send + Sync>;

/// Stage at which a provider call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Token endpoint answered non-2xx, or 2xx without `access_token`.
    AuthenticationFailed,
    /// Resource endpoint answered non-2xx.
    FetchFailed,
    /// Body was not the JSON shape expected.
    InvalidResponse,
    /// No HTTP answer at all: DNS, connect, TLS, timeout.
    NetworkError,
    /// A setting is missing or malformed; no request was made.
    ConfigurationError,
}

impl ProviderErrorCode {
    /// Snake-case name, stable for logs and scripts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::FetchFailed => "fetch_failed",
            Self::InvalidResponse => "invalid_response",
            Self::NetworkError => "network_error",
            Self::ConfigurationError => "configuration_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed provider call.
///
/// Displays as `[provider] code: message`, the prefix only once the adapter
/// has tagged the error with its name.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    provider: Option<&'static str>,
    status: Option<u16>,
    #[source]
    source: Option<Cause>,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.provider {
            Some(provider) => write!(f, "[{}] {}: {}", provider, self.code, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl ProviderError {
    /// Builds an error of any code.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            status: None,
            source: None,
        }
    }

    /// `AuthenticationFailed`.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message)
    }

    /// `FetchFailed`.
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::FetchFailed, message)
    }

    /// `InvalidResponse`.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    /// `NetworkError`.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    /// `ConfigurationError`.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    /// Tags the error with the adapter name (`graph`, `zoho`, `zoom`).
    ///
    /// An existing tag is kept, so shared helpers can tag early and the
    /// adapter's blanket `map_err` does not overwrite it.
    pub fn with_provider(mut self, provider: &'static str) -> Self {
        self.provider.get_or_insert(provider);
        self
    }

    /// Records the HTTP status of the failing answer.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches the underlying cause.
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn provider(&self) -> Option<&'static str> {
        self.provider
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

/// Result alias used by every provider operation.
pub type ProviderResult<T> = Result<T, ProviderError>;
