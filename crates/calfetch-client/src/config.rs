//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/calfetch/config.toml` by default.
//!
//! Credential values (`tenant_id`, `account_id`, `client_id`,
//! `client_secret`, `refresh_token`) support secret references:
//! - `pass::path/in/store`: resolved via `pass show`
//! - `env::VAR_NAME`: resolved from the environment
//! - `file::/path`: first line of the file
//! - plain text: used as-is

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use calfetch_providers::HttpSettings;
use calfetch_providers::graph::GraphConfig;
use calfetch_providers::oauth::ClientCredentials;
use calfetch_providers::zoho::{ZohoConfig, ZohoGrant};
use calfetch_providers::zoom::{ZoomConfig, ZoomMeetingType};

/// Placeholder written by `config dump` in place of literal secrets.
const REDACTED: &str = "<redacted>";

// ---------------------------------------------------------------------------
// ClientConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the calfetch client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Transport settings shared by every provider.
    pub http: HttpSection,

    /// Microsoft Graph settings.
    pub graph: Option<GraphSettings>,

    /// Zoho Calendar settings.
    pub zoho: Option<ZohoSettings>,

    /// Zoom settings.
    pub zoom: Option<ZoomSettings>,
}

/// Transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    /// Request timeout in seconds.
    pub timeout: u64,

    /// User agent override.
    pub user_agent: Option<String>,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout: HttpSettings::DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl HttpSection {
    /// Converts to the providers' transport settings.
    pub fn to_settings(&self) -> HttpSettings {
        let settings = HttpSettings::default().with_timeout(Duration::from_secs(self.timeout));
        match self.user_agent {
            Some(ref user_agent) => settings.with_user_agent(user_agent),
            None => settings,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    ///
    /// A missing file yields the default configuration.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, String> {
        let config: Self =
            toml::from_str(content).map_err(|e| format!("failed to parse config: {}", e))?;
        if config.http.timeout == 0 {
            return Err("http.timeout must be at least 1 second".to_string());
        }
        Ok(config)
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calfetch")
    }

    /// Returns a copy with literal secrets masked.
    ///
    /// Secret references are kept since they only name where the secret
    /// lives.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if let Some(ref mut graph) = config.graph {
            redact(&mut graph.client_secret);
        }
        if let Some(ref mut zoho) = config.zoho {
            redact(&mut zoho.client_secret);
            redact(&mut zoho.refresh_token);
        }
        if let Some(ref mut zoom) = config.zoom {
            redact(&mut zoom.client_secret);
        }
        config
    }
}

fn redact(value: &mut Option<String>) {
    if let Some(v) = value
        && !crate::secret::is_reference(v)
    {
        *v = REDACTED.to_string();
    }
}

/// Resolves a required setting, expanding secret references.
fn resolve_required(section: &str, field: &str, value: Option<&str>) -> Result<String, String> {
    let raw = value.ok_or_else(|| {
        format!(
            "{field} is missing: set it in the [{section}] section of the config file or pass --{}",
            field.replace('_', "-"),
        )
    })?;

    crate::secret::resolve(raw).map_err(|e| format!("failed to resolve {section}.{field}: {e}"))
}

/// Resolves an optional setting, expanding secret references.
fn resolve_optional(section: &str, field: &str, value: Option<&str>) -> Result<Option<String>, String> {
    value
        .map(|raw| {
            crate::secret::resolve(raw)
                .map_err(|e| format!("failed to resolve {section}.{field}: {e}"))
        })
        .transpose()
}

// ---------------------------------------------------------------------------
// GraphSettings
// ---------------------------------------------------------------------------

/// Microsoft Graph settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    /// Directory (tenant) ID.
    pub tenant_id: Option<String>,

    /// Application (client) ID.
    pub client_id: Option<String>,

    /// Client secret.
    pub client_secret: Option<String>,

    /// User whose calendar is read (object ID or UPN).
    pub user_id: Option<String>,

    /// Authority override, e.g. a national cloud.
    pub authority: Option<String>,

    /// Graph API base override.
    pub graph_base: Option<String>,

    /// Scopes requested for the token. Empty means the `.default` scope.
    pub scopes: Vec<String>,
}

impl GraphSettings {
    /// Converts to provider configuration.
    pub fn to_provider_config(&self, http: HttpSettings) -> Result<GraphConfig, String> {
        let tenant_id = resolve_required("graph", "tenant_id", self.tenant_id.as_deref())?;
        let credentials = self.resolve_credentials()?;
        let user_id = resolve_required("graph", "user_id", self.user_id.as_deref())?;

        let mut config = GraphConfig::new(tenant_id, credentials, user_id).with_http(http);
        if let Some(ref authority) = self.authority {
            config = config.with_authority(authority);
        }
        if let Some(ref base) = self.graph_base {
            config = config.with_graph_base(base);
        }
        if !self.scopes.is_empty() {
            config = config.with_scopes(self.scopes.clone());
        }

        config.validate()?;
        Ok(config)
    }

    pub(crate) fn resolve_credentials(&self) -> Result<ClientCredentials, String> {
        Ok(ClientCredentials::new(
            resolve_required("graph", "client_id", self.client_id.as_deref())?,
            resolve_required("graph", "client_secret", self.client_secret.as_deref())?,
        ))
    }
}

// ---------------------------------------------------------------------------
// ZohoSettings
// ---------------------------------------------------------------------------

/// Zoho Calendar settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ZohoSettings {
    /// OAuth client ID.
    pub client_id: Option<String>,

    /// OAuth client secret.
    pub client_secret: Option<String>,

    /// Redirect URI registered for the client.
    pub redirect_uri: Option<String>,

    /// Refresh token from an earlier code exchange.
    pub refresh_token: Option<String>,

    /// Calendar to read. Defaults to `primary`.
    pub calendar_id: Option<String>,

    /// Window start, RFC 3339 (`"2024-01-01T00:00:00Z"`).
    pub from: Option<DateTime<Utc>>,

    /// Window end, RFC 3339.
    pub to: Option<DateTime<Utc>>,

    /// Accounts base override (e.g. `https://accounts.zoho.eu`).
    pub accounts_base: Option<String>,

    /// Calendar API base override.
    pub calendar_base: Option<String>,

    /// Scopes requested on the consent page.
    pub scopes: Vec<String>,
}

impl ZohoSettings {
    /// Converts to provider configuration.
    pub fn to_provider_config(&self, http: HttpSettings) -> Result<ZohoConfig, String> {
        let credentials = ClientCredentials::new(
            resolve_required("zoho", "client_id", self.client_id.as_deref())?,
            resolve_required("zoho", "client_secret", self.client_secret.as_deref())?,
        );
        let config = self.build(credentials, http)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the configuration used for the consent URL.
    ///
    /// Only the client ID and redirect URI are needed there, so a missing
    /// client secret is tolerated.
    pub fn to_authorize_config(&self, http: HttpSettings) -> Result<ZohoConfig, String> {
        let client_id = resolve_required("zoho", "client_id", self.client_id.as_deref())?;
        if self.redirect_uri.is_none() {
            return Err(
                "redirect_uri is required to build the consent URL (pass --redirect-uri)"
                    .to_string(),
            );
        }
        self.build(ClientCredentials::new(client_id, ""), http)
    }

    /// Picks the grant: an explicit code wins over the stored refresh token.
    pub fn grant(&self, code: Option<&str>) -> Result<ZohoGrant, String> {
        if let Some(code) = code {
            return Ok(ZohoGrant::AuthorizationCode(code.to_string()));
        }
        resolve_optional("zoho", "refresh_token", self.refresh_token.as_deref())?
            .map(ZohoGrant::RefreshToken)
            .ok_or_else(|| {
                "no authorization code given and no refresh_token configured: \
                 run `calfetch zoho authorize-url` and pass the code with --code"
                    .to_string()
            })
    }

    /// Resolves the stored refresh token.
    pub fn resolve_refresh_token(&self) -> Result<String, String> {
        resolve_required("zoho", "refresh_token", self.refresh_token.as_deref())
    }

    fn build(&self, credentials: ClientCredentials, http: HttpSettings) -> Result<ZohoConfig, String> {
        let mut config = ZohoConfig::new(credentials, self.redirect_uri.clone().unwrap_or_default())
            .with_http(http);

        if let Some(ref id) = self.calendar_id {
            config = config.with_calendar_id(id);
        }
        if let Some(ref base) = self.accounts_base {
            config = config.with_accounts_base(base);
        }
        if let Some(ref base) = self.calendar_base {
            config = config.with_calendar_base(base);
        }
        if !self.scopes.is_empty() {
            config = config.with_scopes(self.scopes.clone());
        }

        if self.from.is_some() || self.to.is_some() {
            let window = config
                .window()
                .and_then(|default| default.with_bounds(self.from, self.to))
                .map_err(|e| e.to_string())?;
            config = config.with_window(window);
        }
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// ZoomSettings
// ---------------------------------------------------------------------------

/// Zoom settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSettings {
    /// Server-to-server OAuth account ID.
    pub account_id: Option<String>,

    /// OAuth client ID.
    pub client_id: Option<String>,

    /// OAuth client secret.
    pub client_secret: Option<String>,

    /// Meeting listing type.
    pub meeting_type: Option<ZoomMeetingType>,

    /// Page size for the listing.
    pub page_size: Option<u32>,

    /// OAuth base override.
    pub oauth_base: Option<String>,

    /// API base override.
    pub api_base: Option<String>,
}

impl ZoomSettings {
    /// Converts to provider configuration.
    pub fn to_provider_config(&self, http: HttpSettings) -> Result<ZoomConfig, String> {
        let account_id = resolve_required("zoom", "account_id", self.account_id.as_deref())?;
        let credentials = ClientCredentials::new(
            resolve_required("zoom", "client_id", self.client_id.as_deref())?,
            resolve_required("zoom", "client_secret", self.client_secret.as_deref())?,
        );

        let mut config = ZoomConfig::new(account_id, credentials).with_http(http);
        if let Some(meeting_type) = self.meeting_type {
            config = config.with_meeting_type(meeting_type);
        }
        if let Some(page_size) = self.page_size {
            config = config.with_page_size(page_size);
        }
        if let Some(ref base) = self.oauth_base {
            config = config.with_oauth_base(base);
        }
        if let Some(ref base) = self.api_base {
            config = config.with_api_base(base);
        }

        config.validate()?;
        Ok(config)
    }
}
