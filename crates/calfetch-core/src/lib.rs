//! Core types: tracing setup, query time windows

pub mod time;
pub mod tracing;

pub use time::{QUERY_TIME_FORMAT, TimeWindow, TimeWindowError};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
