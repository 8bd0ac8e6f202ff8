//! Zoho Calendar adapter configuration.

use std::fmt;

use calfetch_core::{TimeWindow, TimeWindowError};
use url::Url;

use crate::http::HttpSettings;
use crate::oauth::ClientCredentials;

/// How the Zoho adapter obtains its access token.
#[derive(Clone, PartialEq, Eq)]
pub enum ZohoGrant {
    /// A one-time code from the consent redirect.
    AuthorizationCode(String),
    /// A refresh token issued by an earlier code exchange.
    RefreshToken(String),
}

impl ZohoGrant {
    /// The OAuth `grant_type` value for this grant.
    pub fn grant_type(&self) -> &'static str {
        match self {
            Self::AuthorizationCode(_) => "authorization_code",
            Self::RefreshToken(_) => "refresh_token",
        }
    }
}

impl fmt::Debug for ZohoGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthorizationCode(_) => f.write_str("AuthorizationCode(<redacted>)"),
            Self::RefreshToken(_) => f.write_str("RefreshToken(<redacted>)"),
        }
    }
}

/// Configuration for the Zoho Calendar provider.
#[derive(Debug, Clone)]
pub struct ZohoConfig {
    /// OAuth client credentials from the Zoho API console.
    pub credentials: ClientCredentials,

    /// Redirect URI registered for the client.
    ///
    /// Must match the one used to obtain the authorization code.
    pub redirect_uri: String,

    /// Zoho Accounts base URL (region specific, e.g. `https://accounts.zoho.eu`).
    pub accounts_base: String,

    /// Zoho Calendar base URL.
    pub calendar_base: String,

    /// Calendar to read events from.
    pub calendar_id: String,

    /// Window passed as `from`/`to`; see [`ZohoConfig::window`].
    pub window: Option<TimeWindow>,

    /// Scopes requested on the consent page.
    pub scopes: Vec<String>,

    /// Transport settings.
    pub http: HttpSettings,
}

impl ZohoConfig {
    /// Default Zoho Accounts base URL.
    pub const DEFAULT_ACCOUNTS_BASE: &'static str = "https://accounts.zoho.com";

    /// Default Zoho Calendar base URL.
    pub const DEFAULT_CALENDAR_BASE: &'static str = "https://calendar.zoho.com";

    /// Calendar read when none is configured.
    pub const DEFAULT_CALENDAR_ID: &'static str = "primary";

    /// Calendar year covered by the default window.
    pub const DEFAULT_WINDOW_YEAR: i32 = 2024;

    /// Scopes needed to read calendars and their events.
    pub const DEFAULT_SCOPES: &'static [&'static str] =
        &["ZohoCalendar.calendar.READ", "ZohoCalendar.event.READ"];

    /// Creates a new Zoho configuration.
    pub fn new(credentials: ClientCredentials, redirect_uri: impl Into<String>) -> Self {
        Self {
            credentials,
            redirect_uri: redirect_uri.into(),
            accounts_base: Self::DEFAULT_ACCOUNTS_BASE.to_string(),
            calendar_base: Self::DEFAULT_CALENDAR_BASE.to_string(),
            calendar_id: Self::DEFAULT_CALENDAR_ID.to_string(),
            window: None,
            scopes: Self::DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            http: HttpSettings::default(),
        }
    }

    /// The configured window, or the whole of [`Self::DEFAULT_WINDOW_YEAR`].
    pub fn window(&self) -> Result<TimeWindow, TimeWindowError> {
        match self.window {
            Some(window) => Ok(window),
            None => TimeWindow::calendar_year(Self::DEFAULT_WINDOW_YEAR),
        }
    }

    /// Sets the Accounts base URL.
    pub fn with_accounts_base(mut self, base: impl Into<String>) -> Self {
        self.accounts_base = base.into();
        self
    }

    /// Sets the Calendar base URL.
    pub fn with_calendar_base(mut self, base: impl Into<String>) -> Self {
        self.calendar_base = base.into();
        self
    }

    /// Sets the calendar ID.
    pub fn with_calendar_id(mut self, id: impl Into<String>) -> Self {
        self.calendar_id = id.into();
        self
    }

    /// Sets the query window.
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Sets the consent scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Sets the transport settings.
    pub fn with_http(mut self, http: HttpSettings) -> Self {
        self.http = http;
        self
    }

    /// Token endpoint used for both the code exchange and refreshes.
    pub fn token_url(&self) -> String {
        format!("{}/oauth/v2/token", self.accounts_base.trim_end_matches('/'))
    }

    /// Consent page the authorization code is obtained from.
    pub fn authorize_endpoint(&self) -> String {
        format!("{}/oauth/v2/auth", self.accounts_base.trim_end_matches('/'))
    }

    /// `{calendar_base}/api/v2/calendars/{calendar_id}/events`.
    pub fn events_url(&self) -> Result<Url, String> {
        let mut url = Url::parse(&self.calendar_base)
            .map_err(|e| format!("invalid calendar_base '{}': {}", self.calendar_base, e))?;
        url.path_segments_mut()
            .map_err(|_| format!("calendar_base '{}' cannot be a base URL", self.calendar_base))?
            .pop_if_empty()
            .extend(["api", "v2", "calendars", self.calendar_id.as_str(), "events"]);
        Ok(url)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.credentials
            .validate()
            .map_err(|e| format!("invalid credentials: {}", e))?;

        if self.calendar_id.trim().is_empty() {
            return Err("calendar_id is required".to_string());
        }

        self.window().map_err(|e| e.to_string())?;

        Url::parse(&self.accounts_base)
            .map_err(|e| format!("invalid accounts_base '{}': {}", self.accounts_base, e))?;

        self.events_url().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn test_config() -> ZohoConfig {
        ZohoConfig::new(
            ClientCredentials::new("1000.ABC", "zoho-secret"),
            "http://localhost:8000/callback",
        )
    }

    #[test]
    fn default_endpoints() {
        let config = test_config();
        assert_eq!(config.token_url(), "https://accounts.zoho.com/oauth/v2/token");
        assert_eq!(
            config.authorize_endpoint(),
            "https://accounts.zoho.com/oauth/v2/auth"
        );
        assert_eq!(
            config.events_url().unwrap().as_str(),
            "https://calendar.zoho.com/api/v2/calendars/primary/events"
        );
    }

    #[test]
    fn default_window_is_2024() {
        let (from, to) = test_config().window().unwrap().query_bounds();
        assert_eq!(from, "2024-01-01T00:00:00Z");
        assert_eq!(to, "2024-12-31T23:59:59Z");
    }

    #[test]
    fn builder_methods() {
        let window = TimeWindow::new(
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap(),
        )
        .unwrap();
        let config = test_config()
            .with_accounts_base("https://accounts.zoho.eu/")
            .with_calendar_base("https://calendar.zoho.eu")
            .with_calendar_id("cal uid")
            .with_window(window);

        assert_eq!(config.token_url(), "https://accounts.zoho.eu/oauth/v2/token");
        assert_eq!(
            config.events_url().unwrap().as_str(),
            "https://calendar.zoho.eu/api/v2/calendars/cal%20uid/events"
        );
        assert_eq!(config.window(), Ok(window));
    }

    #[test]
    fn config_validation() {
        assert!(test_config().validate().is_ok());
        assert!(test_config().with_calendar_id("").validate().is_err());
        assert!(
            test_config()
                .with_accounts_base("::nope")
                .validate()
                .is_err()
        );
        let no_secret = ZohoConfig::new(ClientCredentials::new("id", ""), "http://x");
        assert!(no_secret.validate().is_err());
    }

    #[test]
    fn grant_debug_is_redacted() {
        let grant = ZohoGrant::RefreshToken("1000.refresh".to_string());
        assert_eq!(grant.grant_type(), "refresh_token");
        assert!(!format!("{:?}", grant).contains("1000.refresh"));
    }
}
