//! Zoho Calendar provider implementation.

use std::sync::{Mutex, PoisonError};

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::http::get_json;
use crate::oauth::{AccessToken, ClientAuth, request_token};
use crate::provider::{BoxFuture, CalendarProvider};

use super::config::{ZohoConfig, ZohoGrant};
use super::events::{ZohoEvent, ZohoEventsResponse};

/// Tokens issued by an authorization-code exchange.
#[derive(Debug, Clone)]
pub struct ZohoTokens {
    /// The bearer token.
    pub access_token: AccessToken,
    /// Refresh token; Zoho only issues one for `access_type=offline` codes.
    pub refresh_token: Option<String>,
}

/// Zoho Calendar provider.
///
/// A refresh token issued while acquiring the token is kept in memory for
/// the rest of the run and can be taken with
/// [`take_issued_refresh_token`](Self::take_issued_refresh_token).
#[derive(Debug)]
pub struct ZohoProvider {
    config: ZohoConfig,
    http_client: Client,
    grant: Option<ZohoGrant>,
    issued_refresh_token: Mutex<Option<String>>,
}

impl ZohoProvider {
    /// Provider name used in errors and logs.
    pub const NAME: &'static str = "zoho";

    /// Creates a new Zoho provider with the given configuration.
    pub fn new(config: ZohoConfig) -> ProviderResult<Self> {
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
            grant: None,
            issued_refresh_token: Mutex::new(None),
        })
    }

    /// Sets the grant used by [`CalendarProvider::acquire_token`].
    pub fn with_grant(mut self, grant: ZohoGrant) -> Self {
        self.grant = Some(grant);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ZohoConfig {
        &self.config
    }

    /// Exchanges an authorization code for an access and refresh token pair.
    pub async fn exchange_code(&self, code: &str) -> ProviderResult<ZohoTokens> {
        if code.trim().is_empty() {
            return Err(
                ProviderError::configuration("authorization code is empty").with_provider(Self::NAME)
            );
        }
        if self.config.redirect_uri.trim().is_empty() {
            return Err(ProviderError::configuration(
                "redirect_uri is required to exchange an authorization code",
            )
            .with_provider(Self::NAME));
        }

        let form = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.credentials.client_id.as_str()),
            ("client_secret", self.config.credentials.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code", code),
        ];

        let issued = request_token(
            &self.http_client,
            &self.config.token_url(),
            &form,
            ClientAuth::FormOnly,
        )
        .await
        .map_err(|e| e.with_provider(Self::NAME))?;

        if issued.refresh_token.is_none() {
            warn!("Zoho issued no refresh token; request the code with access_type=offline");
        }
        info!("exchanged authorization code for tokens");

        Ok(ZohoTokens {
            access_token: issued.access_token,
            refresh_token: issued.refresh_token,
        })
    }

    /// Exchanges a refresh token for a new access token.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> ProviderResult<AccessToken> {
        if refresh_token.trim().is_empty() {
            return Err(
                ProviderError::configuration("refresh token is empty").with_provider(Self::NAME)
            );
        }

        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", self.config.credentials.client_id.as_str()),
            ("client_secret", self.config.credentials.client_secret.as_str()),
            ("refresh_token", refresh_token),
        ];

        let issued = request_token(
            &self.http_client,
            &self.config.token_url(),
            &form,
            ClientAuth::FormOnly,
        )
        .await
        .map_err(|e| e.with_provider(Self::NAME))?;

        info!("refreshed Zoho access token");
        Ok(issued.access_token)
    }

    /// Acquires a token with the configured grant.
    pub async fn request_token(&self) -> ProviderResult<AccessToken> {
        match &self.grant {
            Some(ZohoGrant::AuthorizationCode(code)) => {
                let tokens = self.exchange_code(code).await?;
                *self
                    .issued_refresh_token
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = tokens.refresh_token;
                Ok(tokens.access_token)
            }
            Some(ZohoGrant::RefreshToken(refresh_token)) => {
                self.refresh_access_token(refresh_token).await
            }
            None => Err(ProviderError::configuration(
                "no authorization code or refresh token configured",
            )
            .with_provider(Self::NAME)),
        }
    }

    /// Takes the refresh token issued by a code exchange during this run.
    pub fn take_issued_refresh_token(&self) -> Option<String> {
        self.issued_refresh_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Fetches the events of the configured calendar inside the window.
    pub async fn fetch_events(&self, token: &AccessToken) -> ProviderResult<Vec<ZohoEvent>> {
        let url = self
            .config
            .events_url()
            .map_err(|e| ProviderError::configuration(e).with_provider(Self::NAME))?;
        let (from, to) = self
            .config
            .window()
            .map_err(|e| ProviderError::configuration(e.to_string()).with_provider(Self::NAME))?
            .query_bounds();

        let response: ZohoEventsResponse = get_json(
            &self.http_client,
            "events",
            url.as_str(),
            token,
            &[("from", from), ("to", to)],
        )
        .await
        .map_err(|e| e.with_provider(Self::NAME))?;

        debug!(
            "fetched {} events from calendar {}",
            response.data.len(),
            self.config.calendar_id
        );
        Ok(response.data)
    }
}

impl CalendarProvider for ZohoProvider {
    type Record = ZohoEvent;

    fn name(&self) -> &str {
        Self::NAME
    }

    fn acquire_token(&self) -> BoxFuture<'_, ProviderResult<AccessToken>> {
        Box::pin(self.request_token())
    }

    fn fetch_records<'a>(
        &'a self,
        token: &'a AccessToken,
    ) -> BoxFuture<'a, ProviderResult<Vec<ZohoEvent>>> {
        Box::pin(self.fetch_events(token))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::ProviderErrorCode;
    use crate::oauth::ClientCredentials;
    use crate::provider::authenticate_and_fetch;

    const EVENTS_PATH: &str = "/api/v2/calendars/primary/events";

    fn provider_for(server: &MockServer) -> ZohoProvider {
        let config = ZohoConfig::new(
            ClientCredentials::new("1000.CLIENT", "zoho-secret"),
            "http://localhost:8000/callback",
        )
        .with_accounts_base(server.uri())
        .with_calendar_base(server.uri());
        ZohoProvider::new(config).unwrap()
    }

    fn events_body() -> serde_json::Value {
        serde_json::json!({
            "data": [
                {"title": "Kickoff", "start": "2024-03-04T10:00:00Z", "end": "2024-03-04T11:00:00Z"},
                {"title": "Retro", "start": "2024-03-08T16:00:00Z", "end": "2024-03-08T17:00:00Z"},
                {"title": "Demo", "start": "2024-03-09T09:00:00Z", "end": "2024-03-09T09:45:00Z"}
            ]
        })
    }

    #[tokio::test]
    async fn exchange_code_returns_token_pair() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/v2/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=CODE-1"))
            .and(body_string_contains("client_id=1000.CLIENT"))
            .and(body_string_contains("client_secret=zoho-secret"))
            .and(body_string_contains(
                "redirect_uri=http%3A%2F%2Flocalhost%3A8000%2Fcallback",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ACCESS-1",
                "refresh_token": "REFRESH-1",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = provider_for(&server).exchange_code("CODE-1").await.unwrap();
        assert_eq!(tokens.access_token.as_str(), "ACCESS-1");
        assert_eq!(tokens.refresh_token.as_deref(), Some("REFRESH-1"));
    }

    #[tokio::test]
    async fn spent_code_is_authentication_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/v2/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": "invalid_code"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(EVENTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(events_body()))
            .expect(0)
            .mount(&server)
            .await;

        let provider =
            provider_for(&server).with_grant(ZohoGrant::AuthorizationCode("CODE-1".to_string()));
        let err = authenticate_and_fetch(&provider).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
        assert_eq!(err.provider(), Some("zoho"));
        assert!(err.message().contains("invalid_code"));
    }

    #[tokio::test]
    async fn refresh_returns_new_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/v2/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=REFRESH-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": "ACCESS-2"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let original = AccessToken::new("ACCESS-1");
        let renewed = provider_for(&server)
            .refresh_access_token("REFRESH-1")
            .await
            .unwrap();
        assert_eq!(renewed.as_str(), "ACCESS-2");
        assert_ne!(renewed, original);
    }

    #[tokio::test]
    async fn refresh_rejected_is_authentication_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/v2/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid refresh token"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .refresh_access_token("stale")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn code_grant_fetches_with_exact_window() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/v2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ACCESS-1",
                "refresh_token": "REFRESH-1"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(EVENTS_PATH))
            .and(header("authorization", "Bearer ACCESS-1"))
            .and(query_param("from", "2024-01-01T00:00:00Z"))
            .and(query_param("to", "2024-12-31T23:59:59Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(events_body()))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            provider_for(&server).with_grant(ZohoGrant::AuthorizationCode("CODE-1".to_string()));
        let events = authenticate_and_fetch(&provider).await.unwrap();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].title, "Kickoff");
        assert_eq!(
            provider.take_issued_refresh_token().as_deref(),
            Some("REFRESH-1")
        );
        assert!(provider.take_issued_refresh_token().is_none());
    }

    #[tokio::test]
    async fn refresh_grant_drives_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/v2/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": "ACCESS-2"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(EVENTS_PATH))
            .and(header("authorization", "Bearer ACCESS-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            provider_for(&server).with_grant(ZohoGrant::RefreshToken("REFRESH-1".to_string()));
        let events = authenticate_and_fetch(&provider).await.unwrap();
        assert!(events.is_empty());
        assert!(provider.take_issued_refresh_token().is_none());
    }

    #[tokio::test]
    async fn missing_grant_is_configuration_error() {
        let server = MockServer::start().await;
        let err = provider_for(&server).request_token().await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ConfigurationError);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn server_error_is_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(EVENTS_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .fetch_events(&AccessToken::new("ACCESS-1"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::FetchFailed);
    }

    #[tokio::test]
    async fn empty_code_is_rejected_before_any_request() {
        let server = MockServer::start().await;
        let err = provider_for(&server).exchange_code(" ").await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ConfigurationError);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn issued_refresh_token_survives_poisoned_slot() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/v2/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ACCESS-1",
                "refresh_token": "REFRESH-NEW"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            provider_for(&server).with_grant(ZohoGrant::AuthorizationCode("CODE-1".to_string()));
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _slot = provider.issued_refresh_token.lock().unwrap();
            panic!("slot holder panicked");
        }));
        assert!(provider.issued_refresh_token.is_poisoned());

        provider.request_token().await.unwrap();
        assert_eq!(
            provider.take_issued_refresh_token().as_deref(),
            Some("REFRESH-NEW")
        );
    }
}
