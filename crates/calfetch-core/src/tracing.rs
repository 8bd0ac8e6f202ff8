//! Logging setup for the calfetch binary.
//!
//! Every log line goes to stderr. Stdout carries only the rendered records,
//! so `calfetch zoom > meetings.txt` captures nothing but meetings.
//!
//! The filter is chosen in this order: an explicit [`TracingConfig::filter`],
//! then `RUST_LOG`, then the configured level applied to the calfetch crates
//! only (dependencies such as `reqwest` and `hyper` stay quiet).
//!
//! ```ignore
//! use calfetch_core::{TracingConfig, TracingOutputFormat, init_tracing};
//!
//! init_tracing(TracingConfig::default().with_format(TracingOutputFormat::Json))?;
//! ```

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Targets the level-based default filter applies to.
const CRATE_TARGETS: &[&str] = &["calfetch_core", "calfetch_providers", "calfetch_client"];

/// Errors from installing the global subscriber.
#[derive(Debug, Error)]
pub enum TracingError {
    /// A subscriber was already installed.
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// The filter directive does not parse.
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
}

/// Line format on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Multi-line, human oriented.
    Pretty,
    /// One line per event.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

impl std::str::FromStr for TracingOutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown log format '{}' (expected pretty, compact or json)",
                other
            )),
        }
    }
}

/// How the subscriber is built.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for the calfetch crates when no filter is given.
    pub level: Level,
    /// Line format.
    pub format: TracingOutputFormat,
    /// Adds timestamps, targets and source locations to each line.
    pub annotate: bool,
    /// Full `EnvFilter` directive; wins over `RUST_LOG` and `level`.
    pub filter: Option<String>,
}

impl Default for TracingConfig {
    /// Warnings only, compact, no annotations.
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: TracingOutputFormat::Compact,
            annotate: false,
            filter: None,
        }
    }
}

impl TracingConfig {
    /// Preset behind `--debug`: debug level with annotated lines.
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            level: Level::DEBUG,
            annotate: true,
            ..Self::default()
        }
    }

    /// Sets the level for the calfetch crates.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the line format.
    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets an explicit filter directive.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// `calfetch_core=L,calfetch_providers=L,calfetch_client=L` for level `L`.
    pub fn default_directive(&self) -> String {
        CRATE_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, self.level))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn env_filter(&self) -> Result<EnvFilter, TracingError> {
        if let Some(ref filter) = self.filter {
            return Ok(EnvFilter::try_new(filter)?);
        }
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => Ok(EnvFilter::try_new(self.default_directive())?),
        }
    }

    fn stderr_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(self.annotate)
            .with_line_number(self.annotate)
            .with_target(self.annotate);

        match self.format {
            TracingOutputFormat::Pretty => layer.pretty().boxed(),
            TracingOutputFormat::Json => layer.json().boxed(),
            TracingOutputFormat::Compact if self.annotate => layer.compact().boxed(),
            TracingOutputFormat::Compact => layer.compact().without_time().boxed(),
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails when called twice or when the filter directive does not parse.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.env_filter()?;
    let subscriber = tracing_subscriber::registry()
        .with(config.stderr_layer())
        .with(filter);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
