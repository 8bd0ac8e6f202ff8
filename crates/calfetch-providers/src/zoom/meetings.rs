//! Zoom meeting records.

use std::fmt;

use serde::Deserialize;

/// Meeting ID; Zoom sends a JSON number, older payloads a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MeetingId {
    /// Numeric ID.
    Number(u64),
    /// String ID.
    Text(String),
}

impl fmt::Display for MeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{}", id),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// One meeting from `/users/me/meetings`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZoomMeeting {
    /// Meeting ID.
    pub id: MeetingId,
    /// Meeting topic.
    pub topic: String,
    /// Start time; recurring meetings without a fixed time have none.
    #[serde(default)]
    pub start_time: Option<String>,
    /// URL participants join with.
    pub join_url: String,
}

impl ZoomMeeting {
    /// Start time, or an empty string when Zoom omitted it.
    pub fn start_time(&self) -> &str {
        self.start_time.as_deref().unwrap_or_default()
    }
}

/// Body of the meetings response. A missing `meetings` key means none.
#[derive(Debug, Deserialize)]
pub(crate) struct ZoomMeetingsResponse {
    #[serde(default)]
    pub meetings: Vec<ZoomMeeting>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub total_records: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_and_string_ids() {
        let json = r#"{
            "page_size": 30,
            "total_records": 2,
            "next_page_token": "",
            "meetings": [
                {"id": 85746065432, "topic": "Weekly sync", "start_time": "2024-05-01T09:00:00Z", "join_url": "https://zoom.us/j/85746065432"},
                {"id": "abc", "topic": "Office hours", "type": 3, "join_url": "https://zoom.us/j/1"}
            ]
        }"#;

        let response: ZoomMeetingsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.meetings.len(), 2);
        assert_eq!(response.total_records, Some(2));
        assert_eq!(response.meetings[0].id.to_string(), "85746065432");
        assert_eq!(response.meetings[1].id, MeetingId::Text("abc".to_string()));
        assert_eq!(response.meetings[1].start_time(), "");
    }

    #[test]
    fn missing_meetings_means_none() {
        let response: ZoomMeetingsResponse = serde_json::from_str("{}").unwrap();
        assert!(response.meetings.is_empty());
        assert!(response.next_page_token.is_none());
    }

    #[test]
    fn meeting_without_join_url_is_rejected() {
        let json = r#"{"meetings": [{"id": 1, "topic": "x"}]}"#;
        assert!(serde_json::from_str::<ZoomMeetingsResponse>(json).is_err());
    }
}
