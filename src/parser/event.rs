//! Lifecycle event decoding.
//!
//! The toolkit reports transaction progress as JSON objects on stderr, one
//! per line, interleaved with arbitrary diagnostic text. A line is an event
//! only if it decodes as JSON and carries a recognized `message`, a
//! `tx_hash` and a numeric `timestamp` (milliseconds). Everything else is
//! skipped without raising an error.

use serde::Deserialize;

/// The lifecycle stages a submitted transaction can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleStage {
    Sending,
    Sent,
    BestBlock,
    FailedToReachBestBlock,
    Finalized,
    FailedToFinalize,
}

impl LifecycleStage {
    /// Number of distinct stages
    pub const COUNT: usize = 6;

    /// All stages, in pipeline order
    pub const ALL: [LifecycleStage; Self::COUNT] = [
        LifecycleStage::Sending,
        LifecycleStage::Sent,
        LifecycleStage::BestBlock,
        LifecycleStage::FailedToReachBestBlock,
        LifecycleStage::Finalized,
        LifecycleStage::FailedToFinalize,
    ];

    /// Map a `message` field value to a stage
    pub fn from_message(message: &str) -> Option<Self> {
        match message {
            "SENDING" => Some(LifecycleStage::Sending),
            "SENT" => Some(LifecycleStage::Sent),
            "BEST_BLOCK" => Some(LifecycleStage::BestBlock),
            "FAILED_TO_REACH_BEST_BLOCK" => Some(LifecycleStage::FailedToReachBestBlock),
            "FINALIZED" => Some(LifecycleStage::Finalized),
            "FAILED_TO_FINALIZE" => Some(LifecycleStage::FailedToFinalize),
            _ => None,
        }
    }

    /// The wire `message` value for this stage
    pub fn as_message(self) -> &'static str {
        match self {
            LifecycleStage::Sending => "SENDING",
            LifecycleStage::Sent => "SENT",
            LifecycleStage::BestBlock => "BEST_BLOCK",
            LifecycleStage::FailedToReachBestBlock => "FAILED_TO_REACH_BEST_BLOCK",
            LifecycleStage::Finalized => "FINALIZED",
            LifecycleStage::FailedToFinalize => "FAILED_TO_FINALIZE",
        }
    }

    /// Slot index inside a transaction trace
    pub(crate) fn index(self) -> usize {
        match self {
            LifecycleStage::Sending => 0,
            LifecycleStage::Sent => 1,
            LifecycleStage::BestBlock => 2,
            LifecycleStage::FailedToReachBestBlock => 3,
            LifecycleStage::Finalized => 4,
            LifecycleStage::FailedToFinalize => 5,
        }
    }
}

/// One decoded lifecycle event
#[derive(Debug, Clone)]
pub struct LifecycleEvent {
    pub stage: LifecycleStage,
    pub tx_hash: String,
    pub timestamp_ms: i64,
}

/// Raw shape of an event line
///
/// The timestamp is accepted as any JSON number; some toolkit builds emit it
/// as a float.
#[derive(Deserialize)]
struct RawEvent {
    message: String,
    tx_hash: String,
    timestamp: f64,
}

/// Decode one log line into a lifecycle event
///
/// **Public** - entry point used by the trace builder
///
/// Returns `None` for non-JSON lines, JSON lacking the expected fields, and
/// unrecognized message kinds. Never fails.
pub fn parse_event_line(line: &str) -> Option<LifecycleEvent> {
    let raw: RawEvent = serde_json::from_str(line).ok()?;
    let stage = LifecycleStage::from_message(&raw.message)?;

    Some(LifecycleEvent {
        stage,
        tx_hash: raw.tx_hash,
        timestamp_ms: raw.timestamp as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_event() {
        let line = r#"{"message":"SENT","tx_hash":"0xabc","timestamp":1700000000123}"#;
        let event = parse_event_line(line).unwrap();
        assert_eq!(event.stage, LifecycleStage::Sent);
        assert_eq!(event.tx_hash, "0xabc");
        assert_eq!(event.timestamp_ms, 1_700_000_000_123);
    }

    #[test]
    fn test_parse_event_with_extra_fields() {
        let line = r#"{"message":"SENDING","tx_hash":"0xdef","timestamp":5,"target":"ws://relay:9944"}"#;
        let event = parse_event_line(line).unwrap();
        assert_eq!(event.stage, LifecycleStage::Sending);
    }

    #[test]
    fn test_parse_rejects_unknown_message() {
        let line = r#"{"message":"CONNECTED","tx_hash":"0xabc","timestamp":5}"#;
        assert!(parse_event_line(line).is_none());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(parse_event_line("2024-01-01 INFO connecting to relay").is_none());
        assert!(parse_event_line("").is_none());
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        assert!(parse_event_line(r#"{"message":"SENT","timestamp":5}"#).is_none());
        assert!(parse_event_line(r#"{"message":"SENT","tx_hash":"0xabc"}"#).is_none());
    }

    #[test]
    fn test_stage_roundtrip() {
        for stage in LifecycleStage::ALL {
            assert_eq!(LifecycleStage::from_message(stage.as_message()), Some(stage));
        }
    }
}
