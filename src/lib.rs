//! Transaction pipeline benchmarking suite.
//!
//! Operator tooling for exercising a blockchain node's transaction pipeline
//! end to end: generating and submitting signed transactions at scale,
//! funding test wallets, registering dust addresses, polling balances,
//! aggregating transaction lifecycle traces into latency statistics, and
//! pulling structured logs from a log-aggregation service.
//!
//! All cryptographic and protocol work is delegated to an external toolkit
//! binary invoked as a subprocess.
//!
//! This crate provides the core implementation for the `txbench` CLI tool.

pub mod aggregator;
pub mod commands;
pub mod loki;
pub mod output;
pub mod parser;
pub mod toolkit;
pub mod utils;
