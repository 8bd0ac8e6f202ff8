//! Errors surfaced by the `calfetch` binary.

use thiserror::Error;

use calfetch_providers::ProviderError;

pub type ClientResult<T> = Result<T, ClientError>;

/// Everything `main` can print after `error: `.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The config file, a flag, or a secret reference is unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// Already tagged with the provider name.
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// Writing output or the config file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
