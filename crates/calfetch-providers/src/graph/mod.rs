//! Microsoft Graph calendar provider.
//!
//! Reads a single user's calendar with application permissions:
//!
//! 1. POST the client-credentials grant to
//!    `{authority}/oauth2/v2.0/token` with scope
//!    `https://graph.microsoft.com/.default`
//! 2. GET `{graph_base}/users/{user_id}/events` with the bearer token
//!
//! Only the first page of events is read; `@odata.nextLink` is logged, not
//! followed.
//!
//! # Example
//!
//! ```ignore
//! use calfetch_providers::graph::{GraphConfig, GraphProvider};
//! use calfetch_providers::{ClientCredentials, authenticate_and_fetch};
//!
//! let config = GraphConfig::new(tenant_id, ClientCredentials::new(id, secret), user_id);
//! let provider = GraphProvider::new(config)?;
//! let events = authenticate_and_fetch(&provider).await?;
//! ```

mod config;
mod events;
mod provider;

pub use config::GraphConfig;
pub use events::{GraphDateTime, GraphEvent};
pub use provider::GraphProvider;
