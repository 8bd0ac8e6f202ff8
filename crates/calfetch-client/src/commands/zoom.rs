//! `calfetch zoom`.

use std::io::{self, Write};

use calfetch_providers::authenticate_and_fetch;
use calfetch_providers::zoom::{ZoomMeeting, ZoomProvider};

use crate::cli::ZoomArgs;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::render;

/// Fetches the account's meetings and prints them.
pub async fn run(args: ZoomArgs, config: &ClientConfig) -> ClientResult<()> {
    let meetings = fetch(args, config).await?;

    let mut stdout = io::stdout().lock();
    render::zoom_meetings(&mut stdout, &meetings)?;
    stdout.flush()?;
    Ok(())
}

/// Resolves settings and runs the token and fetch round trips.
pub async fn fetch(args: ZoomArgs, config: &ClientConfig) -> ClientResult<Vec<ZoomMeeting>> {
    let mut settings = config.zoom.clone().unwrap_or_default();
    args.apply(&mut settings);

    let provider_config = settings
        .to_provider_config(config.http.to_settings())
        .map_err(ClientError::Config)?;
    let provider = ZoomProvider::new(provider_config)?;

    Ok(authenticate_and_fetch(&provider).await?)
}
