//! Output JSON schema for benchmark reports.
//!
//! This module defines the structure of the analysis report written to disk
//! after a batch submission. Field names are kept stable so reports remain
//! comparable across benchmark runs.

use serde::{Deserialize, Serialize};

/// Descriptive statistics over one latency sample set (milliseconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    /// Smallest sample
    pub min: i64,

    /// Largest sample
    pub max: i64,

    /// Arithmetic mean
    pub avg: f64,

    /// Element at index n/2 of the ascending sort (lower median for even n)
    pub median: i64,

    /// Element at index floor(0.95 * n) when n >= 20, else the maximum
    pub p95: i64,

    /// Number of samples
    pub count: usize,
}

/// Aggregated analysis of one batch submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceReport {
    /// Distinct transactions observed, regardless of which events they have
    pub total_transactions: usize,

    /// Transactions that reached the relay (SENT)
    pub sent_count: usize,

    /// Transactions included in a best block
    pub best_block_count: usize,

    /// Transactions finalized
    pub finalized_count: usize,

    /// Transactions that failed to reach a best block
    pub failed_best_block_count: usize,

    /// Transactions that failed to finalize
    pub failed_finalize_count: usize,

    /// Observed submission rate (tx/s); absent without two distinct
    /// SENDING timestamps
    pub send_rate_tps: Option<f64>,

    /// SENDING -> SENT
    pub submission_latency_ms: Option<LatencyStats>,

    /// SENT -> BEST_BLOCK
    pub block_inclusion_latency_ms: Option<LatencyStats>,

    /// BEST_BLOCK -> FINALIZED
    pub finalization_latency_ms: Option<LatencyStats>,

    /// SENDING -> FINALIZED
    pub total_latency_ms: Option<LatencyStats>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}
