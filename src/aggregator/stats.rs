//! Latency statistics over completed transaction traces.
//!
//! Reduces the trace index into per-stage success counts, latency
//! distributions for each adjacent stage pair, and the observed send rate.

use super::trace_builder::TraceIndex;
use crate::parser::event::LifecycleStage;
use crate::parser::schema::{LatencyStats, TraceReport};
use chrono::Utc;
use log::debug;

/// Descriptive statistics for one latency sample set
///
/// **Public** - also used directly by tests
///
/// Index conventions are kept bit-for-bit compatible with the historical
/// analyzer so results stay comparable across benchmark runs: median is the
/// element at index n/2 of the ascending sort (the lower median for even n,
/// not an averaged one) and p95 is the element at index floor(0.95 * n) when
/// n >= 20, the maximum otherwise. Do not replace these with interpolating
/// definitions.
///
/// Samples may be negative when node clocks disagree; they pass through
/// unfiltered. An empty set has no statistics.
pub fn calc_stats(samples: &[i64]) -> Option<LatencyStats> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    let sum: i64 = sorted.iter().sum();

    Some(LatencyStats {
        min: sorted[0],
        max: sorted[n - 1],
        avg: sum as f64 / n as f64,
        median: sorted[n / 2],
        p95: if n >= 20 {
            sorted[(n as f64 * 0.95) as usize]
        } else {
            sorted[n - 1]
        },
        count: n,
    })
}

/// Reduce the trace index into the benchmark report
///
/// **Public** - main entry point for the statistics pass
///
/// One pass over the index. Latency samples are taken only from traces
/// holding both endpoints of a stage pair. Never fails; an empty index
/// yields zero counts and absent statistics.
pub fn analyze_traces(traces: &TraceIndex) -> TraceReport {
    let total_transactions = traces.len();

    let mut sent_count = 0usize;
    let mut best_block_count = 0usize;
    let mut finalized_count = 0usize;
    let mut failed_best_block_count = 0usize;
    let mut failed_finalize_count = 0usize;

    let mut submission = Vec::new();
    let mut inclusion = Vec::new();
    let mut finalization = Vec::new();
    let mut total = Vec::new();

    // First/last SENDING timestamps, for the send rate
    let mut first_sending: Option<i64> = None;
    let mut last_sending: Option<i64> = None;

    for trace in traces.values() {
        let sending = trace.stage_ts(LifecycleStage::Sending);
        let sent = trace.stage_ts(LifecycleStage::Sent);
        let best_block = trace.stage_ts(LifecycleStage::BestBlock);
        let finalized = trace.stage_ts(LifecycleStage::Finalized);

        if let Some(ts) = sending {
            first_sending = Some(first_sending.map_or(ts, |first| first.min(ts)));
            last_sending = Some(last_sending.map_or(ts, |last| last.max(ts)));
        }

        if sent.is_some() {
            sent_count += 1;
        }
        if best_block.is_some() {
            best_block_count += 1;
        }
        if finalized.is_some() {
            finalized_count += 1;
        }
        if trace.has(LifecycleStage::FailedToReachBestBlock) {
            failed_best_block_count += 1;
        }
        if trace.has(LifecycleStage::FailedToFinalize) {
            failed_finalize_count += 1;
        }

        if let (Some(t0), Some(t1)) = (sending, sent) {
            submission.push(t1 - t0);
        }
        if let (Some(t0), Some(t1)) = (sent, best_block) {
            inclusion.push(t1 - t0);
        }
        if let (Some(t0), Some(t1)) = (best_block, finalized) {
            finalization.push(t1 - t0);
        }
        if let (Some(t0), Some(t1)) = (sending, finalized) {
            total.push(t1 - t0);
        }
    }

    // The rate needs at least two distinct SENDING timestamps
    let send_rate_tps = match (first_sending, last_sending) {
        (Some(first), Some(last)) if first != last => {
            let duration_sec = (last - first) as f64 / 1000.0;
            Some(total_transactions as f64 / duration_sec)
        }
        _ => None,
    };

    debug!(
        "analyzed {} traces: {} sent, {} in block, {} finalized",
        total_transactions, sent_count, best_block_count, finalized_count
    );

    TraceReport {
        total_transactions,
        sent_count,
        best_block_count,
        finalized_count,
        failed_best_block_count,
        failed_finalize_count,
        send_rate_tps,
        submission_latency_ms: calc_stats(&submission),
        block_inclusion_latency_ms: calc_stats(&inclusion),
        finalization_latency_ms: calc_stats(&finalization),
        total_latency_ms: calc_stats(&total),
        generated_at: Utc::now().to_rfc3339(),
    }
}

/// Print the human-readable analysis summary to stdout
///
/// **Public** - used by the send-batch and analyze commands
pub fn print_summary(report: &TraceReport) {
    let total = report.total_transactions;
    let pct = |count: usize| {
        if total > 0 {
            100.0 * count as f64 / total as f64
        } else {
            0.0
        }
    };

    println!("\n{}", "=".repeat(60));
    println!("TRANSACTION ANALYSIS SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Total Transactions: {total}");
    println!("  Sent:       {} ({:.1}%)", report.sent_count, pct(report.sent_count));
    println!(
        "  In Block:   {} ({:.1}%)",
        report.best_block_count,
        pct(report.best_block_count)
    );
    println!(
        "  Finalized:  {} ({:.1}%)",
        report.finalized_count,
        pct(report.finalized_count)
    );
    if report.failed_best_block_count > 0 || report.failed_finalize_count > 0 {
        println!("  Failed Block: {}", report.failed_best_block_count);
        println!("  Failed Final: {}", report.failed_finalize_count);
    }

    if let Some(rate) = report.send_rate_tps {
        println!("\nSend Rate: {rate:.2} tx/s");
    }

    print_latency_block("Submission Latency (SENDING->SENT)", &report.submission_latency_ms);
    print_latency_block(
        "Block Inclusion Latency (SENT->BEST_BLOCK)",
        &report.block_inclusion_latency_ms,
    );
    print_latency_block(
        "Finalization Latency (BEST_BLOCK->FINALIZED)",
        &report.finalization_latency_ms,
    );
    print_latency_block("Total Latency (SENDING->FINALIZED)", &report.total_latency_ms);
    println!("{}\n", "=".repeat(60));
}

fn print_latency_block(name: &str, stats: &Option<LatencyStats>) {
    if let Some(stats) = stats {
        println!("\n{name}:");
        println!("  Min: {}ms  Max: {}ms", stats.min, stats.max);
        println!(
            "  Avg: {:.0}ms  Median: {}ms  P95: {}ms",
            stats.avg, stats.median, stats.p95
        );
    }
}
