//! Console rendering of provider records.
//!
//! Each renderer prints a fixed set of fields per record. Records are shown
//! as the provider returned them, in response order.

use std::io::{self, Write};

use calfetch_providers::graph::GraphEvent;
use calfetch_providers::zoho::ZohoEvent;
use calfetch_providers::zoom::ZoomMeeting;

/// Width of the line printed after each Zoom meeting.
const SEPARATOR_WIDTH: usize = 40;

/// Writes Graph events.
pub fn graph_events<W: Write>(out: &mut W, events: &[GraphEvent]) -> io::Result<()> {
    writeln!(out, "Calendar Events:")?;
    for event in events {
        writeln!(
            out,
            "Event: {}, Start: {}, End: {}",
            event.subject(),
            event.start.date_time,
            event.end.date_time
        )?;
    }
    Ok(())
}

/// Writes Zoho events, preceded by their count.
pub fn zoho_events<W: Write>(out: &mut W, events: &[ZohoEvent]) -> io::Result<()> {
    writeln!(out, "Retrieved {} events.", events.len())?;
    for event in events {
        writeln!(
            out,
            "Event: {}, Start: {}, End: {}",
            event.title, event.start, event.end
        )?;
    }
    Ok(())
}

/// Writes Zoom meetings, one block each.
pub fn zoom_meetings<W: Write>(out: &mut W, meetings: &[ZoomMeeting]) -> io::Result<()> {
    if meetings.is_empty() {
        return writeln!(out, "No meetings found.");
    }

    writeln!(out, "Meetings:")?;
    let separator = "-".repeat(SEPARATOR_WIDTH);
    for meeting in meetings {
        writeln!(out, "Meeting ID: {}", meeting.id)?;
        writeln!(out, "Topic: {}", meeting.topic)?;
        writeln!(out, "Start Time: {}", meeting.start_time())?;
        writeln!(out, "Join URL: {}", meeting.join_url)?;
        writeln!(out, "{}", separator)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn graph_fixture() -> Vec<GraphEvent> {
        serde_json::from_value(serde_json::json!([
            {
                "subject": "Standup",
                "start": {"dateTime": "2024-05-01T09:00:00.0000000", "timeZone": "UTC"},
                "end": {"dateTime": "2024-05-01T09:15:00.0000000", "timeZone": "UTC"}
            },
            {
                "start": {"dateTime": "2024-05-01T13:00:00.0000000", "timeZone": "UTC"},
                "end": {"dateTime": "2024-05-01T14:00:00.0000000", "timeZone": "UTC"}
            }
        ]))
        .unwrap()
    }

    #[test]
    fn graph_lists_every_event() {
        let output = capture(|out| graph_events(out, &graph_fixture()));
        insta::assert_snapshot!(output, @r"
        Calendar Events:
        Event: Standup, Start: 2024-05-01T09:00:00.0000000, End: 2024-05-01T09:15:00.0000000
        Event: , Start: 2024-05-01T13:00:00.0000000, End: 2024-05-01T14:00:00.0000000
        ");
    }

    #[test]
    fn graph_empty_prints_header_only() {
        let output = capture(|out| graph_events(out, &[]));
        assert_eq!(output, "Calendar Events:\n");
    }

    #[test]
    fn zoho_prints_count_then_events() {
        let events: Vec<ZohoEvent> = serde_json::from_value(serde_json::json!([
            {"title": "Quarterly review", "start": "20240315T100000Z", "end": "20240315T110000Z"},
            {"title": "1:1", "start": "20240318T090000Z", "end": "20240318T093000Z"}
        ]))
        .unwrap();

        let output = capture(|out| zoho_events(out, &events));
        insta::assert_snapshot!(output, @r"
        Retrieved 2 events.
        Event: Quarterly review, Start: 20240315T100000Z, End: 20240315T110000Z
        Event: 1:1, Start: 20240318T090000Z, End: 20240318T093000Z
        ");
    }

    #[test]
    fn zoho_empty_reports_zero() {
        let output = capture(|out| zoho_events(out, &[]));
        assert_eq!(output, "Retrieved 0 events.\n");
    }

    #[test]
    fn zoom_prints_block_per_meeting() {
        let meetings: Vec<ZoomMeeting> = serde_json::from_value(serde_json::json!([
            {
                "id": 81234567890u64,
                "topic": "Design review",
                "start_time": "2024-05-02T15:00:00Z",
                "join_url": "https://zoom.us/j/81234567890"
            },
            {
                "id": "85550001111",
                "topic": "Retro",
                "start_time": "2024-05-03T16:00:00Z",
                "join_url": "https://zoom.us/j/85550001111"
            }
        ]))
        .unwrap();

        let output = capture(|out| zoom_meetings(out, &meetings));
        insta::assert_snapshot!(output, @r"
        Meetings:
        Meeting ID: 81234567890
        Topic: Design review
        Start Time: 2024-05-02T15:00:00Z
        Join URL: https://zoom.us/j/81234567890
        ----------------------------------------
        Meeting ID: 85550001111
        Topic: Retro
        Start Time: 2024-05-03T16:00:00Z
        Join URL: https://zoom.us/j/85550001111
        ----------------------------------------
        ");
    }

    #[test]
    fn zoom_meeting_without_start_time() {
        let meetings: Vec<ZoomMeeting> = serde_json::from_value(serde_json::json!([
            {"id": 1, "topic": "Recurring, no fixed time", "join_url": "https://zoom.us/j/1"}
        ]))
        .unwrap();

        let output = capture(|out| zoom_meetings(out, &meetings));
        assert!(output.contains("Start Time: \n"));
    }

    #[test]
    fn zoom_empty_reports_no_meetings() {
        let output = capture(|out| zoom_meetings(out, &[]));
        assert_eq!(output, "No meetings found.\n");
    }
}
