//! `calfetch graph`.

use std::io::{self, Write};

use calfetch_providers::authenticate_and_fetch;
use calfetch_providers::graph::{GraphEvent, GraphProvider};

use crate::cli::GraphArgs;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::render;

/// Fetches the configured user's events and prints them.
pub async fn run(args: GraphArgs, config: &ClientConfig) -> ClientResult<()> {
    let events = fetch(args, config).await?;
    print(&mut io::stdout().lock(), &events)
}

/// Resolves settings and runs the token and fetch round trips.
pub async fn fetch(args: GraphArgs, config: &ClientConfig) -> ClientResult<Vec<GraphEvent>> {
    let mut settings = config.graph.clone().unwrap_or_default();
    args.apply(&mut settings);

    let provider_config = settings
        .to_provider_config(config.http.to_settings())
        .map_err(ClientError::Config)?;
    let provider = GraphProvider::new(provider_config)?;

    Ok(authenticate_and_fetch(&provider).await?)
}

fn print<W: Write>(out: &mut W, events: &[GraphEvent]) -> ClientResult<()> {
    render::graph_events(out, events)?;
    out.flush()?;
    Ok(())
}
