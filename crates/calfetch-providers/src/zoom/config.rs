//! Zoom adapter configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::http::HttpSettings;
use crate::oauth::ClientCredentials;

/// Which meetings `/users/me/meetings` lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomMeetingType {
    /// All valid previous, live and upcoming scheduled meetings.
    Scheduled,
    /// Meetings in progress.
    Live,
    /// Upcoming meetings, including live ones.
    #[default]
    Upcoming,
    /// Upcoming meetings only.
    UpcomingMeetings,
    /// Meetings that already happened.
    PreviousMeetings,
}

impl ZoomMeetingType {
    /// The `type` query value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Live => "live",
            Self::Upcoming => "upcoming",
            Self::UpcomingMeetings => "upcoming_meetings",
            Self::PreviousMeetings => "previous_meetings",
        }
    }
}

impl fmt::Display for ZoomMeetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoomMeetingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "live" => Ok(Self::Live),
            "upcoming" => Ok(Self::Upcoming),
            "upcoming_meetings" => Ok(Self::UpcomingMeetings),
            "previous_meetings" => Ok(Self::PreviousMeetings),
            other => Err(format!("unknown meeting type '{}'", other)),
        }
    }
}

/// Configuration for the Zoom provider.
#[derive(Debug, Clone)]
pub struct ZoomConfig {
    /// Account ID of the server-to-server OAuth app.
    pub account_id: String,

    /// Client credentials of the server-to-server OAuth app.
    pub credentials: ClientCredentials,

    /// OAuth base URL.
    pub oauth_base: String,

    /// REST API base URL.
    pub api_base: String,

    /// Meeting listing type.
    pub meeting_type: ZoomMeetingType,

    /// Number of meetings requested; only this first page is read.
    pub page_size: u32,

    /// Transport settings.
    pub http: HttpSettings,
}

impl ZoomConfig {
    /// Default OAuth base URL.
    pub const DEFAULT_OAUTH_BASE: &'static str = "https://zoom.us";

    /// Default REST API base URL.
    pub const DEFAULT_API_BASE: &'static str = "https://api.zoom.us";

    /// Default page size.
    pub const DEFAULT_PAGE_SIZE: u32 = 30;

    /// Largest page size Zoom accepts.
    pub const MAX_PAGE_SIZE: u32 = 300;

    /// Creates a new Zoom configuration.
    pub fn new(account_id: impl Into<String>, credentials: ClientCredentials) -> Self {
        Self {
            account_id: account_id.into(),
            credentials,
            oauth_base: Self::DEFAULT_OAUTH_BASE.to_string(),
            api_base: Self::DEFAULT_API_BASE.to_string(),
            meeting_type: ZoomMeetingType::default(),
            page_size: Self::DEFAULT_PAGE_SIZE,
            http: HttpSettings::default(),
        }
    }

    /// Sets the OAuth base URL.
    pub fn with_oauth_base(mut self, base: impl Into<String>) -> Self {
        self.oauth_base = base.into();
        self
    }

    /// Sets the REST API base URL.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Sets the meeting listing type.
    pub fn with_meeting_type(mut self, meeting_type: ZoomMeetingType) -> Self {
        self.meeting_type = meeting_type;
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the transport settings.
    pub fn with_http(mut self, http: HttpSettings) -> Self {
        self.http = http;
        self
    }

    /// `{oauth_base}/oauth/token`.
    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.oauth_base.trim_end_matches('/'))
    }

    /// `{api_base}/v2/users/me/meetings`.
    pub fn meetings_url(&self) -> String {
        format!("{}/v2/users/me/meetings", self.api_base.trim_end_matches('/'))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.credentials
            .validate()
            .map_err(|e| format!("invalid credentials: {}", e))?;

        if self.account_id.trim().is_empty() {
            return Err("account_id is required".to_string());
        }

        if !(1..=Self::MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(format!(
                "page_size must be between 1 and {}, got {}",
                Self::MAX_PAGE_SIZE,
                self.page_size
            ));
        }

        Url::parse(&self.token_url()).map_err(|e| format!("invalid oauth_base: {}", e))?;
        Url::parse(&self.meetings_url()).map_err(|e| format!("invalid api_base: {}", e))?;
        Ok(())
    }
}
