//! Calendar provider adapters.
//!
//! This crate provides one adapter per calendar backend, all built on the
//! same two-step shape:
//!
//! - [`CalendarProvider`] - acquire a bearer token, then fetch one page of records
//! - [`authenticate_and_fetch`] - runs the two steps in order
//! - [`ProviderError`] - error taxonomy shared by every adapter
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  ┌──────────────┐  ┌──────────────┐
//! │ MS identity  │  │ Zoho Accounts│  │  Zoom OAuth  │
//! └──────┬───────┘  └──────┬───────┘  └──────┬───────┘
//!        │ token           │ token           │ token
//!        ▼                 ▼                 ▼
//! ┌──────────────┐  ┌──────────────┐  ┌──────────────┐
//! │GraphProvider │  │ ZohoProvider │  │ ZoomProvider │
//! └──────┬───────┘  └──────┬───────┘  └──────┬───────┘
//!        │ GET             │ GET             │ GET
//!        ▼                 ▼                 ▼
//!   Vec<GraphEvent>   Vec<ZohoEvent>   Vec<ZoomMeeting>
//! ```
//!
//! The adapters share no state and never call each other. Records are kept
//! in each provider's own shape.

pub mod error;
pub mod graph;
pub mod http;
pub mod oauth;
pub mod provider;
pub mod zoho;
pub mod zoom;

// Re-export main types at crate root
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use http::HttpSettings;
pub use oauth::{AccessToken, ClientCredentials, IssuedToken};
pub use provider::{BoxFuture, CalendarProvider, authenticate_and_fetch};
