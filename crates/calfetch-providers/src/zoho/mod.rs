//! Zoho Calendar provider.
//!
//! # Authentication Flow
//!
//! 1. The user opens [`authorization_url`] and grants access
//! 2. Zoho redirects to the registered redirect URI with a one-time code
//! 3. [`ZohoProvider::exchange_code`] trades the code for an access and
//!    refresh token pair
//! 4. Later runs use [`ZohoProvider::refresh_access_token`] instead
//!
//! Events are read from `{calendar_base}/api/v2/calendars/{id}/events` with
//! `from`/`to` bounds taken from the configured [`TimeWindow`].
//!
//! Nothing is persisted: a refresh token issued during a run lives only in
//! memory.
//!
//! [`TimeWindow`]: calfetch_core::TimeWindow

mod authorize;
mod config;
mod events;
mod provider;

pub use authorize::{authorization_url, generate_state};
pub use config::{ZohoConfig, ZohoGrant};
pub use events::ZohoEvent;
pub use provider::{ZohoProvider, ZohoTokens};
