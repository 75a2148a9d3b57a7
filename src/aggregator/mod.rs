//! Aggregation of lifecycle events into traces and latency statistics.
//!
//! This module transforms the raw event stream of a batch submission into:
//! - A per-transaction trace index (one slot per lifecycle stage)
//! - Success counts and latency distributions across transactions

pub mod stats;
pub mod trace_builder;

// Re-export main types and functions
pub use stats::{analyze_traces, calc_stats, print_summary};
pub use trace_builder::{build_traces, TraceIndex, TransactionTrace};
