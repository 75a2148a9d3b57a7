//! Fold raw log lines into per-transaction lifecycle traces.
//!
//! The builder consumes the mixed stderr stream of a batch submission in a
//! single forward pass. Each recognized event lands in a fixed slot of its
//! transaction's trace; later events of the same kind overwrite earlier
//! ones. Unrecognizable lines are skipped, so the builder never fails.

use crate::parser::event::{parse_event_line, LifecycleEvent, LifecycleStage};
use log::debug;
use std::collections::HashMap;

/// Fixed record of the lifecycle stages observed for one transaction
///
/// One optional millisecond timestamp per stage. A trace is keyed by a
/// single transaction hash for its whole lifetime; the hash itself lives in
/// the index key.
#[derive(Debug, Clone, Default)]
pub struct TransactionTrace {
    slots: [Option<i64>; LifecycleStage::COUNT],
}

impl TransactionTrace {
    /// Record an event timestamp, overwriting any earlier one for the stage
    pub fn record(&mut self, stage: LifecycleStage, timestamp_ms: i64) {
        self.slots[stage.index()] = Some(timestamp_ms);
    }

    /// Timestamp at which the stage was observed, if at all
    pub fn stage_ts(&self, stage: LifecycleStage) -> Option<i64> {
        self.slots[stage.index()]
    }

    /// Whether the stage was observed
    pub fn has(&self, stage: LifecycleStage) -> bool {
        self.slots[stage.index()].is_some()
    }
}

/// Per-transaction trace index keyed by transaction hash
pub type TraceIndex = HashMap<String, TransactionTrace>;

/// Build the trace index from a stream of raw log lines
///
/// **Public** - main entry point for trace reduction
///
/// Consumes the input once, front to back. Any line that does not decode as
/// a recognized lifecycle event is silently skipped: the stream interleaves
/// events with unrelated diagnostics.
pub fn build_traces<I, S>(lines: I) -> TraceIndex
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut traces = TraceIndex::new();
    let mut recognized = 0usize;

    for line in lines {
        if let Some(event) = parse_event_line(line.as_ref()) {
            let LifecycleEvent { stage, tx_hash, timestamp_ms } = event;
            traces.entry(tx_hash).or_default().record(stage, timestamp_ms);
            recognized += 1;
        }
    }

    debug!(
        "indexed {} lifecycle events across {} transactions",
        recognized,
        traces.len()
    );

    traces
}
