//! Zoom meetings provider.
//!
//! Uses a server-to-server OAuth app:
//!
//! 1. POST `grant_type=account_credentials` to `{oauth_base}/oauth/token`
//! 2. GET `{api_base}/v2/users/me/meetings?type=upcoming&page_size=30`
//!
//! Only the first page is read. A non-empty `next_page_token` is logged.

mod config;
mod meetings;
mod provider;

pub use config::{ZoomConfig, ZoomMeetingType};
pub use meetings::{MeetingId, ZoomMeeting};
pub use provider::ZoomProvider;
