//! calfetch CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use calfetch_client::cli::{Cli, Command, ConfigAction};
use calfetch_client::commands;
use calfetch_client::config::ClientConfig;
use calfetch_client::error::{ClientError, ClientResult};
use calfetch_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config.with_format(cli.log_format)) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    // An explicit path must exist; the default one is optional.
    let (config, config_path) = match cli.config {
        Some(path) => (
            ClientConfig::load_from(&path).map_err(ClientError::Config)?,
            path,
        ),
        None => (
            ClientConfig::load().map_err(ClientError::Config)?,
            ClientConfig::default_path(),
        ),
    };
    debug!("using configuration at {}", config_path.display());

    match cli.command {
        Command::Graph(args) => commands::graph::run(args, &config).await,
        Command::Zoho { action } => commands::zoho::run(action, &config, &config_path).await,
        Command::Zoom(args) => commands::zoom::run(args, &config).await,
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config_path),
        },
    }
}
