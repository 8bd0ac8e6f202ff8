//! Consent URL for the Zoho authorization-code flow.
//!
//! The code exchanged by [`ZohoProvider::exchange_code`] comes from the
//! redirect that follows this page. `access_type=offline` makes Zoho issue a
//! refresh token alongside the access token.
//!
//! [`ZohoProvider::exchange_code`]: super::ZohoProvider::exchange_code

use rand::Rng as _;
use rand::distr::Alphanumeric;

use super::config::ZohoConfig;

/// Length of generated `state` values.
const STATE_LENGTH: usize = 24;

/// Generates a random `state` value for CSRF protection.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LENGTH)
        .map(char::from)
        .collect()
}

/// Builds the Zoho consent URL.
///
/// Scopes are comma separated, as Zoho expects.
pub fn authorization_url(config: &ZohoConfig, state: &str) -> String {
    let scope = config.scopes.join(",");

    format!(
        "{}?response_type=code&client_id={}&scope={}&redirect_uri={}&\
        access_type=offline&prompt=consent&state={}",
        config.authorize_endpoint(),
        urlencoding::encode(&config.credentials.client_id),
        urlencoding::encode(&scope),
        urlencoding::encode(&config.redirect_uri),
        urlencoding::encode(state),
    )
}
