//! Query time windows.
//!
//! [`TimeWindow`] bounds the events a provider is asked for. Providers that
//! take the bounds as query parameters format them with
//! [`TimeWindow::query_bounds`], which uses second precision and a literal
//! `Z` suffix (`2024-01-01T00:00:00Z`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format used when a window bound is sent as a query parameter.
pub const QUERY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Errors from building a [`TimeWindow`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeWindowError {
    /// Start lies after end.
    #[error("time window start {start} is after end {end}")]
    Inverted {
        /// Requested start.
        start: DateTime<Utc>,
        /// Requested end.
        end: DateTime<Utc>,
    },
    /// The year cannot be represented.
    #[error("year {0} is out of range")]
    InvalidYear(i32),
}

/// A time window for querying calendar events.
///
/// Both bounds are inclusive: `[start, end]` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window.
    pub start: DateTime<Utc>,
    /// End of the window.
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeWindowError> {
        if start > end {
            return Err(TimeWindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Covers a whole calendar year, from `YYYY-01-01T00:00:00Z` to
    /// `YYYY-12-31T23:59:59Z`.
    pub fn calendar_year(year: i32) -> Result<Self, TimeWindowError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or(TimeWindowError::InvalidYear(year))?
            .and_utc();
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .ok_or(TimeWindowError::InvalidYear(year))?
            .and_utc();
        Ok(Self { start, end })
    }

    /// Overrides either bound and checks the resulting window once.
    ///
    /// Both overrides are applied before the check, so a window can be moved
    /// entirely past its current end.
    pub fn with_bounds(
        self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, TimeWindowError> {
        Self::new(start.unwrap_or(self.start), end.unwrap_or(self.end))
    }

    /// Start and end formatted with [`QUERY_TIME_FORMAT`].
    pub fn query_bounds(&self) -> (String, String) {
        (
            self.start.format(QUERY_TIME_FORMAT).to_string(),
            self.end.format(QUERY_TIME_FORMAT).to_string(),
        )
    }
}
