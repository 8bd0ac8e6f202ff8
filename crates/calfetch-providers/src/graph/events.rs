//! Graph calendar event records.

use serde::Deserialize;

/// A Graph `dateTimeTimeZone` value, kept as the provider sent it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDateTime {
    /// Local date and time, e.g. `2024-05-01T09:00:00.0000000`.
    pub date_time: String,
    /// Windows or IANA zone name the date is expressed in.
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// One event from `/users/{id}/events`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEvent {
    /// Event ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Subject line. Graph sends `null` for some private events.
    #[serde(default)]
    pub subject: Option<String>,
    /// Start time.
    pub start: GraphDateTime,
    /// End time.
    pub end: GraphDateTime,
}

impl GraphEvent {
    /// Subject, or an empty string when Graph omitted it.
    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or_default()
    }
}

/// Body of the events collection response.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphEventsResponse {
    pub value: Vec<GraphEvent>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}
