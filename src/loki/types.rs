//! Wire types for the log aggregation range-query API.
//!
//! Mirrors the Loki `query_range` response shape: a status envelope around a
//! set of named streams, each stream holding ordered (timestamp, line)
//! pairs with nanosecond timestamps serialized as strings.

use serde::Deserialize;
use std::collections::HashMap;

/// Top-level range-query response envelope
#[derive(Debug, Deserialize)]
pub struct QueryRangeResponse {
    /// Must be "success"; anything else fails the fetch
    pub status: String,

    #[serde(default)]
    pub data: Option<QueryRangeData>,
}

/// Result payload of a successful query
#[derive(Debug, Deserialize)]
pub struct QueryRangeData {
    #[serde(rename = "resultType", default)]
    pub result_type: String,

    #[serde(default)]
    pub result: Vec<LogStream>,
}

/// One named group of log entries sharing a label set
#[derive(Debug, Clone, Deserialize)]
pub struct LogStream {
    /// Stream labels (host, job, ...)
    #[serde(default)]
    pub stream: HashMap<String, String>,

    /// Ordered (timestamp-as-string, line) pairs
    #[serde(default)]
    pub values: Vec<(String, String)>,
}

/// One log line with its nanosecond timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp_ns: i64,
    pub line: String,
}
