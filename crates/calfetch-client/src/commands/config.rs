//! Configuration commands.

use std::path::Path;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration to stdout, literal secrets masked.
pub fn dump(config: &ClientConfig, config_path: &Path) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(&config.redacted())
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", config_path.display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration.
///
/// Every present section is resolved the way a fetch would resolve it,
/// secret references included. No network call is made.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    for line in check(config)? {
        println!("{}", line);
    }
    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(config_path: &Path) -> ClientResult<()> {
    println!("config: {}", config_path.display());
    Ok(())
}

fn check(config: &ClientConfig) -> ClientResult<Vec<&'static str>> {
    let http = config.http.to_settings();
    let mut report = Vec::new();

    if let Some(ref graph) = config.graph {
        graph
            .to_provider_config(http.clone())
            .map_err(|e| ClientError::Config(format!("invalid [graph] settings: {}", e)))?;
        report.push("Graph settings are valid.");
    }

    if let Some(ref zoho) = config.zoho {
        zoho.to_provider_config(http.clone())
            .map_err(|e| ClientError::Config(format!("invalid [zoho] settings: {}", e)))?;
        report.push("Zoho settings are valid.");
    }

    if let Some(ref zoom) = config.zoom {
        zoom.to_provider_config(http)
            .map_err(|e| ClientError::Config(format!("invalid [zoom] settings: {}", e)))?;
        report.push("Zoom settings are valid.");
    }

    Ok(report)
}
