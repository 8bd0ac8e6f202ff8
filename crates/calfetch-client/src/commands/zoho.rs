//! `calfetch zoho`.

use std::io::{self, Write};
use std::path::Path;

use tracing::{info, warn};

use calfetch_providers::authenticate_and_fetch;
use calfetch_providers::zoho::{ZohoEvent, ZohoProvider, authorization_url, generate_state};

use crate::cli::{ZohoAction, ZohoCredentialArgs};
use crate::config::{ClientConfig, ZohoSettings};
use crate::error::{ClientError, ClientResult};
use crate::render;

/// Options of `zoho events`.
#[derive(Debug, Default)]
pub struct EventsOptions {
    /// Authorization code from the consent redirect.
    pub code: Option<String>,
    /// Refresh token override.
    pub refresh_token: Option<String>,
    /// Calendar override.
    pub calendar_id: Option<String>,
    /// Window start override.
    pub from: Option<chrono::DateTime<chrono::Utc>>,
    /// Window end override.
    pub to: Option<chrono::DateTime<chrono::Utc>>,
    /// Write an issued refresh token back to the config file.
    pub save: bool,
}

/// Events fetched in one run, plus the refresh token a code exchange issued.
#[derive(Debug)]
pub struct FetchedEvents {
    /// Events in response order.
    pub events: Vec<ZohoEvent>,
    /// Refresh token from the code exchange, if one happened.
    pub issued_refresh_token: Option<String>,
}

/// Dispatches a Zoho action.
pub async fn run(action: ZohoAction, config: &ClientConfig, config_path: &Path) -> ClientResult<()> {
    match action {
        ZohoAction::AuthorizeUrl {
            credentials,
            scopes,
            state,
        } => {
            let url = consent_url(credentials, scopes, state, config)?;
            println!("Open this URL, approve access, then pass the `code` from the redirect to");
            println!("`calfetch zoho events --code <CODE>`:");
            println!();
            println!("{}", url);
            Ok(())
        }
        ZohoAction::Events {
            credentials,
            code,
            refresh_token,
            calendar_id,
            from,
            to,
            save,
        } => {
            let options = EventsOptions {
                code,
                refresh_token,
                calendar_id,
                from,
                to,
                save,
            };
            events(credentials, options, config, config_path).await
        }
        ZohoAction::Refresh {
            credentials,
            refresh_token,
        } => {
            let token = refresh(credentials, refresh_token, config).await?;
            println!("New access token: {}", token);
            Ok(())
        }
    }
}

/// Builds the consent URL.
pub fn consent_url(
    credentials: ZohoCredentialArgs,
    scopes: Vec<String>,
    state: Option<String>,
    config: &ClientConfig,
) -> ClientResult<String> {
    let mut settings = settings(config, credentials);
    if !scopes.is_empty() {
        settings.scopes = scopes;
    }

    let zoho_config = settings
        .to_authorize_config(config.http.to_settings())
        .map_err(ClientError::Config)?;
    let state = state.unwrap_or_else(generate_state);

    Ok(authorization_url(&zoho_config, &state))
}

/// Fetches and prints the calendar's events.
async fn events(
    credentials: ZohoCredentialArgs,
    options: EventsOptions,
    config: &ClientConfig,
    config_path: &Path,
) -> ClientResult<()> {
    let save = options.save;
    let fetched = fetch_events(credentials, options, config).await?;

    if let Some(ref refresh_token) = fetched.issued_refresh_token {
        if save {
            save_refresh_token(config_path, refresh_token)?;
            eprintln!("Refresh token saved to {}", config_path.display());
        } else {
            eprintln!("Refresh token (store it as [zoho] refresh_token): {}", refresh_token);
        }
    } else if save {
        warn!("no refresh token was issued, nothing to save");
    }

    let mut stdout = io::stdout().lock();
    render::zoho_events(&mut stdout, &fetched.events)?;
    stdout.flush()?;
    Ok(())
}

/// Resolves settings, acquires a token with the selected grant and fetches.
pub async fn fetch_events(
    credentials: ZohoCredentialArgs,
    options: EventsOptions,
    config: &ClientConfig,
) -> ClientResult<FetchedEvents> {
    let mut settings = settings(config, credentials);
    if options.refresh_token.is_some() {
        settings.refresh_token = options.refresh_token;
    }
    if options.calendar_id.is_some() {
        settings.calendar_id = options.calendar_id;
    }
    if options.from.is_some() {
        settings.from = options.from;
    }
    if options.to.is_some() {
        settings.to = options.to;
    }

    let grant = settings
        .grant(options.code.as_deref())
        .map_err(ClientError::Config)?;
    let zoho_config = settings
        .to_provider_config(config.http.to_settings())
        .map_err(ClientError::Config)?;
    let provider = ZohoProvider::new(zoho_config)?.with_grant(grant);

    let events = authenticate_and_fetch(&provider).await?;
    Ok(FetchedEvents {
        events,
        issued_refresh_token: provider.take_issued_refresh_token(),
    })
}

/// Exchanges a refresh token for a new access token.
pub async fn refresh(
    credentials: ZohoCredentialArgs,
    refresh_token: Option<String>,
    config: &ClientConfig,
) -> ClientResult<String> {
    let mut settings = settings(config, credentials);
    if refresh_token.is_some() {
        settings.refresh_token = refresh_token;
    }

    let refresh_token = settings
        .resolve_refresh_token()
        .map_err(ClientError::Config)?;
    let zoho_config = settings
        .to_provider_config(config.http.to_settings())
        .map_err(ClientError::Config)?;
    let provider = ZohoProvider::new(zoho_config)?;

    let token = provider.refresh_access_token(&refresh_token).await?;
    Ok(token.into_inner())
}

fn settings(config: &ClientConfig, credentials: ZohoCredentialArgs) -> ZohoSettings {
    let mut settings = config.zoho.clone().unwrap_or_default();
    credentials.apply(&mut settings);
    settings
}

/// Writes `refresh_token` into the `[zoho]` table of the config file.
///
/// Other content, comments included, is preserved.
pub fn save_refresh_token(config_path: &Path, refresh_token: &str) -> ClientResult<()> {
    let content = if config_path.exists() {
        std::fs::read_to_string(config_path)?
    } else {
        String::new()
    };

    let mut doc = content.parse::<toml_edit::DocumentMut>().map_err(|e| {
        ClientError::Config(format!(
            "could not parse {} for writing: {}",
            config_path.display(),
            e
        ))
    })?;

    if !doc.contains_key("zoho") {
        doc["zoho"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    let zoho = doc["zoho"].as_table_mut().ok_or_else(|| {
        ClientError::Config(format!("[zoho] in {} is not a table", config_path.display()))
    })?;
    zoho["refresh_token"] = toml_edit::value(refresh_token);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(config_path, doc.to_string())?;

    info!("saved Zoho refresh token to {}", config_path.display());
    Ok(())
}
