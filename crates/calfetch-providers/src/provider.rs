//! CalendarProvider trait definition.
//!
//! Every adapter follows the same linear sequence: acquire a bearer token,
//! then fetch one page of records with it. [`authenticate_and_fetch`] is the
//! only place that sequences the two steps, so a fetch can never run
//! without a token.

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, info};

use crate::error::ProviderResult;
use crate::oauth::AccessToken;

/// A boxed future for trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The core abstraction for calendar providers.
///
/// Records are provider-specific: no normalization across providers is
/// attempted.
///
/// # Example Implementation
///
/// ```ignore
/// impl CalendarProvider for ZoomProvider {
///     type Record = ZoomMeeting;
///
///     fn name(&self) -> &str { "zoom" }
///
///     fn acquire_token(&self) -> BoxFuture<'_, ProviderResult<AccessToken>> {
///         Box::pin(self.request_token())
///     }
///
///     fn fetch_records<'a>(
///         &'a self,
///         token: &'a AccessToken,
///     ) -> BoxFuture<'a, ProviderResult<Vec<ZoomMeeting>>> {
///         Box::pin(self.fetch_meetings(token))
///     }
/// }
/// ```
pub trait CalendarProvider: Send + Sync {
    /// The record type returned by the provider's events endpoint.
    type Record: Send;

    /// Returns the name of this provider (e.g., "graph", "zoho", "zoom").
    fn name(&self) -> &str;

    /// Performs one token endpoint round trip.
    ///
    /// # Errors
    ///
    /// Returns an authentication error when the endpoint answers with a
    /// non-success status or without an access token.
    fn acquire_token(&self) -> BoxFuture<'_, ProviderResult<AccessToken>>;

    /// Performs one authenticated GET and returns the decoded records.
    ///
    /// # Errors
    ///
    /// Returns a fetch error on a non-success status and an invalid
    /// response error when the body cannot be decoded.
    fn fetch_records<'a>(
        &'a self,
        token: &'a AccessToken,
    ) -> BoxFuture<'a, ProviderResult<Vec<Self::Record>>>;
}

/// Acquires a token and then fetches the provider's records with it.
pub async fn authenticate_and_fetch<P>(provider: &P) -> ProviderResult<Vec<P::Record>>
where
    P: CalendarProvider + ?Sized,
{
    let token = provider.acquire_token().await?;
    info!("{}: authentication successful", provider.name());

    let records = provider.fetch_records(&token).await?;
    debug!("{}: fetched {} records", provider.name(), records.len());
    Ok(records)
}
