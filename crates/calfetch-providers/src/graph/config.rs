//! Microsoft Graph adapter configuration.

use url::Url;

use crate::http::HttpSettings;
use crate::oauth::ClientCredentials;

/// Configuration for the Microsoft Graph provider.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Directory (tenant) ID the application is registered in.
    pub tenant_id: String,

    /// Application (client) credentials.
    pub credentials: ClientCredentials,

    /// User whose calendar is read: object ID or user principal name.
    pub user_id: String,

    /// Authority override.
    ///
    /// Defaults to `https://login.microsoftonline.com/{tenant_id}`. Set this
    /// for national clouds or tests.
    pub authority: Option<String>,

    /// Graph API base URL, including the version segment.
    pub graph_base: String,

    /// OAuth scopes requested with the client-credentials grant.
    pub scopes: Vec<String>,

    /// Transport settings.
    pub http: HttpSettings,
}

impl GraphConfig {
    /// Login host used to derive the default authority.
    pub const DEFAULT_AUTHORITY_HOST: &'static str = "https://login.microsoftonline.com";

    /// Default Graph API base.
    pub const DEFAULT_GRAPH_BASE: &'static str = "https://graph.microsoft.com/v1.0";

    /// Application permissions scope for Graph.
    pub const DEFAULT_SCOPE: &'static str = "https://graph.microsoft.com/.default";

    /// Creates a new Graph configuration.
    pub fn new(
        tenant_id: impl Into<String>,
        credentials: ClientCredentials,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            credentials,
            user_id: user_id.into(),
            authority: None,
            graph_base: Self::DEFAULT_GRAPH_BASE.to_string(),
            scopes: vec![Self::DEFAULT_SCOPE.to_string()],
            http: HttpSettings::default(),
        }
    }

    /// Sets the authority URL.
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    /// Sets the Graph API base URL.
    pub fn with_graph_base(mut self, base: impl Into<String>) -> Self {
        self.graph_base = base.into();
        self
    }

    /// Sets the OAuth scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Sets the transport settings.
    pub fn with_http(mut self, http: HttpSettings) -> Self {
        self.http = http;
        self
    }

    /// The authority tokens are requested from.
    pub fn authority(&self) -> String {
        match &self.authority {
            Some(authority) => authority.trim_end_matches('/').to_string(),
            None => format!("{}/{}", Self::DEFAULT_AUTHORITY_HOST, self.tenant_id),
        }
    }

    /// The v2.0 token endpoint of the authority.
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.authority())
    }

    /// `{graph_base}/users/{user_id}/events`, with the user ID encoded as a
    /// single path segment.
    pub fn events_url(&self) -> Result<Url, String> {
        let mut url = Url::parse(&self.graph_base)
            .map_err(|e| format!("invalid graph_base '{}': {}", self.graph_base, e))?;
        url.path_segments_mut()
            .map_err(|_| format!("graph_base '{}' cannot be a base URL", self.graph_base))?
            .pop_if_empty()
            .extend(["users", self.user_id.as_str(), "events"]);
        Ok(url)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.credentials
            .validate()
            .map_err(|e| format!("invalid credentials: {}", e))?;

        if self.authority.is_none() && self.tenant_id.trim().is_empty() {
            return Err("tenant_id is required".to_string());
        }

        if self.user_id.trim().is_empty() {
            return Err("user_id is required".to_string());
        }

        if self.scopes.is_empty() {
            return Err("at least one OAuth scope is required".to_string());
        }

        self.events_url().map(|_| ())
    }
}
