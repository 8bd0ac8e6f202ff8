//! Command implementations.

pub mod config;
pub mod graph;
pub mod zoho;
pub mod zoom;
