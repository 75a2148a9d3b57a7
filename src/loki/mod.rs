//! Paginated log collection from a Loki-style aggregation service.
//!
//! This module handles:
//! - The blocking HTTP client for the range-query endpoint
//! - Cursor-style pagination with per-page stream merging
//! - Wire types for the query response

pub mod client;
pub mod fetch;
pub mod types;

// Re-export main types
pub use client::LokiClient;
pub use fetch::{fetch_lines, LogLines, PageSource};
pub use types::{LogEntry, LogStream, QueryRangeData, QueryRangeResponse};
