//! Zoho Calendar event records.

use serde::Deserialize;

/// One event from `/api/v2/calendars/{id}/events`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZohoEvent {
    /// Event title.
    pub title: String,
    /// Start, as sent by Zoho.
    pub start: String,
    /// End, as sent by Zoho.
    pub end: String,
    /// Event UID, when present.
    #[serde(default)]
    pub uid: Option<String>,
}

/// Body of the events response. A missing `data` key means no events.
#[derive(Debug, Deserialize)]
pub(crate) struct ZohoEventsResponse {
    #[serde(default)]
    pub data: Vec<ZohoEvent>,
}
