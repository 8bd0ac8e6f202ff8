//! Zoom provider implementation.

use reqwest::Client;
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};
use crate::http::get_json;
use crate::oauth::{AccessToken, ClientAuth, request_token};
use crate::provider::{BoxFuture, CalendarProvider};

use super::config::ZoomConfig;
use super::meetings::{ZoomMeeting, ZoomMeetingsResponse};

/// Zoom provider.
#[derive(Debug)]
pub struct ZoomProvider {
    config: ZoomConfig,
    http_client: Client,
}

impl ZoomProvider {
    /// Provider name used in errors and logs.
    pub const NAME: &'static str = "zoom";

    /// Creates a new Zoom provider with the given configuration.
    pub fn new(config: ZoomConfig) -> ProviderResult<Self> {
        config
            .validate()
            .map_err(|e| ProviderError::configuration(e).with_provider(Self::NAME))?;
        let http_client = config
            .http
            .build_client()
            .map_err(|e| e.with_provider(Self::NAME))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    /// Acquires a token with the account-credentials grant.
    pub async fn request_token(&self) -> ProviderResult<AccessToken> {
        let form = [
            ("grant_type", "account_credentials"),
            ("account_id", self.config.account_id.as_str()),
            ("client_id", self.config.credentials.client_id.as_str()),
            ("client_secret", self.config.credentials.client_secret.as_str()),
        ];

        let issued = request_token(
            &self.http_client,
            &self.config.token_url(),
            &form,
            ClientAuth::Basic(&self.config.credentials),
        )
        .await
        .map_err(|e| e.with_provider(Self::NAME))?;

        info!("obtained Zoom account token");
        Ok(issued.access_token)
    }

    /// Fetches the first page of the authenticated user's meetings.
    pub async fn fetch_meetings(&self, token: &AccessToken) -> ProviderResult<Vec<ZoomMeeting>> {
        let query = [
            ("type", self.config.meeting_type.as_str().to_string()),
            ("page_size", self.config.page_size.to_string()),
        ];

        let response: ZoomMeetingsResponse = get_json(
            &self.http_client,
            "meetings",
            &self.config.meetings_url(),
            token,
            &query,
        )
        .await
        .map_err(|e| e.with_provider(Self::NAME))?;

        if let Some(next) = response.next_page_token.as_deref().filter(|t| !t.is_empty()) {
            debug!(
                "{} meetings in total, next page token {} not followed",
                response
                    .total_records
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
                next
            );
        }

        Ok(response.meetings)
    }
}

impl CalendarProvider for ZoomProvider {
    type Record = ZoomMeeting;

    fn name(&self) -> &str {
        Self::NAME
    }

    fn acquire_token(&self) -> BoxFuture<'_, ProviderResult<AccessToken>> {
        Box::pin(self.request_token())
    }

    fn fetch_records<'a>(
        &'a self,
        token: &'a AccessToken,
    ) -> BoxFuture<'a, ProviderResult<Vec<ZoomMeeting>>> {
        Box::pin(self.fetch_meetings(token))
    }
}
