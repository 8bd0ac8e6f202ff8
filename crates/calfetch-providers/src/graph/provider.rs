//! Microsoft Graph provider implementation.

use reqwest::Client;
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};
use crate::http::get_json;
use crate::oauth::{AccessToken, ClientAuth, request_token};
use crate::provider::{BoxFuture, CalendarProvider};

use super::config::GraphConfig;
use super::events::{GraphEvent, GraphEventsResponse};

/// Microsoft Graph provider.
#[derive(Debug)]
pub struct GraphProvider {
    config: GraphConfig,
    http_client: Client,
}

impl GraphProvider {
    /// Provider name used in errors and logs.
    pub const NAME: &'static str = "graph";

    /// Creates a new Graph provider with the given configuration.
    pub fn new(config: GraphConfig) -> ProviderResult<Self> {
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
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Acquires an application-only token with the client-credentials grant.
    pub async fn request_token(&self) -> ProviderResult<AccessToken> {
        let scope = self.config.scopes.join(" ");
        let form = [
            ("client_id", self.config.credentials.client_id.as_str()),
            ("client_secret", self.config.credentials.client_secret.as_str()),
            ("scope", scope.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let issued = request_token(
            &self.http_client,
            &self.config.token_url(),
            &form,
            ClientAuth::FormOnly,
        )
        .await
        .map_err(|e| e.with_provider(Self::NAME))?;

        info!("obtained Graph application token");
        Ok(issued.access_token)
    }

    /// Fetches the first page of the configured user's events.
    pub async fn fetch_events(&self, token: &AccessToken) -> ProviderResult<Vec<GraphEvent>> {
        let url = self
            .config
            .events_url()
            .map_err(|e| ProviderError::configuration(e).with_provider(Self::NAME))?;

        let response: GraphEventsResponse = get_json(&self.http_client, "events", url.as_str(), token, &[])
            .await
            .map_err(|e| e.with_provider(Self::NAME))?;

        if let Some(next) = response.next_link {
            debug!("more events available at {}, only the first page is read", next);
        }

        debug!(
            "fetched {} events for user {}",
            response.value.len(),
            self.config.user_id
        );
        Ok(response.value)
    }
}

impl CalendarProvider for GraphProvider {
    type Record = GraphEvent;

    fn name(&self) -> &str {
        Self::NAME
    }

    fn acquire_token(&self) -> BoxFuture<'_, ProviderResult<AccessToken>> {
        Box::pin(self.request_token())
    }

    fn fetch_records<'a>(
        &'a self,
        token: &'a AccessToken,
    ) -> BoxFuture<'a, ProviderResult<Vec<GraphEvent>>> {
        Box::pin(self.fetch_events(token))
    }
}
