use pretty_assertions::assert_eq;
use txbench_suite::aggregator::{analyze_traces, build_traces, calc_stats};

fn event(message: &str, tx: &str, ts: i64) -> String {
    format!(r#"{{"message":"{message}","tx_hash":"{tx}","timestamp":{ts}}}"#)
}

/// Full lifecycle for one transaction, offset by `base` milliseconds
fn full_lifecycle(tx: &str, base: i64) -> Vec<String> {
    vec![
        event("SENDING", tx, base),
        event("SENT", tx, base + 50),
        event("BEST_BLOCK", tx, base + 2_050),
        event("FINALIZED", tx, base + 8_050),
    ]
}

#[test]
fn test_total_transactions_counts_distinct_ids() {
    let mut lines = Vec::new();
    lines.extend(full_lifecycle("0xa", 1_000));
    lines.push(event("SENDING", "0xb", 1_100));
    // 0xc only ever fails; still a distinct transaction
    lines.push(event("FAILED_TO_REACH_BEST_BLOCK", "0xc", 1_200));

    let report = analyze_traces(&build_traces(&lines));

    assert_eq!(report.total_transactions, 3);
    assert_eq!(report.sent_count, 1);
    assert_eq!(report.best_block_count, 1);
    assert_eq!(report.finalized_count, 1);
    assert_eq!(report.failed_best_block_count, 1);
    assert_eq!(report.failed_finalize_count, 0);
}

#[test]
fn test_submission_latency_is_exact_delta() {
    let lines = vec![event("SENDING", "0xa", 1_000), event("SENT", "0xa", 1_337)];

    let report = analyze_traces(&build_traces(&lines));

    let stats = report.submission_latency_ms.unwrap();
    assert_eq!(stats.min, 337);
    assert_eq!(stats.max, 337);
    assert_eq!(stats.count, 1);
    assert!(report.block_inclusion_latency_ms.is_none());
}

#[test]
fn test_latency_absent_when_either_endpoint_missing() {
    let lines = vec![
        event("SENT", "0xa", 1_000),
        event("SENDING", "0xb", 1_000),
    ];

    let report = analyze_traces(&build_traces(&lines));

    assert!(report.submission_latency_ms.is_none());
    assert_eq!(report.total_transactions, 2);
}

#[test]
fn test_all_four_stage_pairs() {
    let lines = full_lifecycle("0xa", 10_000);

    let report = analyze_traces(&build_traces(&lines));

    assert_eq!(report.submission_latency_ms.unwrap().max, 50);
    assert_eq!(report.block_inclusion_latency_ms.unwrap().max, 2_000);
    assert_eq!(report.finalization_latency_ms.unwrap().max, 6_000);
    assert_eq!(report.total_latency_ms.unwrap().max, 8_050);
}

#[test]
fn test_negative_latency_passes_through() {
    // Clock skew between nodes can order SENT before SENDING
    let lines = vec![event("SENDING", "0xa", 2_000), event("SENT", "0xa", 1_500)];

    let report = analyze_traces(&build_traces(&lines));

    assert_eq!(report.submission_latency_ms.unwrap().min, -500);
}

#[test]
fn test_empty_and_garbage_input_yields_empty_report() {
    let lines = vec![
        "plain diagnostic text".to_string(),
        r#"{"message":"SENT"}"#.to_string(),
        "{broken json".to_string(),
    ];

    let report = analyze_traces(&build_traces(&lines));

    assert_eq!(report.total_transactions, 0);
    assert_eq!(report.sent_count, 0);
    assert!(report.submission_latency_ms.is_none());
    assert!(report.total_latency_ms.is_none());
    assert!(report.send_rate_tps.is_none());
}

#[test]
fn test_send_rate_absent_for_single_sending_timestamp() {
    // Two transactions sharing one SENDING timestamp: no usable time span
    let lines = vec![
        event("SENDING", "0xa", 5_000),
        event("SENDING", "0xb", 5_000),
    ];

    let report = analyze_traces(&build_traces(&lines));

    assert_eq!(report.total_transactions, 2);
    assert!(report.send_rate_tps.is_none());
}

#[test]
fn test_send_rate_from_sending_span() {
    // 4 transactions over a 2 second SENDING span
    let lines = vec![
        event("SENDING", "0xa", 10_000),
        event("SENDING", "0xb", 10_500),
        event("SENDING", "0xc", 11_500),
        event("SENDING", "0xd", 12_000),
    ];

    let report = analyze_traces(&build_traces(&lines));

    let rate = report.send_rate_tps.unwrap();
    assert!((rate - 2.0).abs() < 1e-9);
}

#[test]
fn test_duplicate_event_overwrites_timestamp() {
    let lines = vec![
        event("SENDING", "0xa", 1_000),
        event("SENT", "0xa", 1_100),
        // Re-emitted SENT supersedes the earlier one
        event("SENT", "0xa", 1_400),
    ];

    let report = analyze_traces(&build_traces(&lines));

    assert_eq!(report.sent_count, 1);
    assert_eq!(report.submission_latency_ms.unwrap().max, 400);
}

#[test]
fn test_median_uses_floor_index_convention() {
    let stats = calc_stats(&[10, 20, 30, 40]).unwrap();
    // Element at index 4/2 = 2 of the ascending sort
    assert_eq!(stats.median, 30);

    let stats = calc_stats(&[10, 20, 30, 40, 50]).unwrap();
    assert_eq!(stats.median, 30);
}

#[test]
fn test_p95_index_convention() {
    let samples: Vec<i64> = (0..25).collect();
    assert_eq!(calc_stats(&samples).unwrap().p95, 23);

    // Below 20 samples p95 degrades to the maximum
    let samples: Vec<i64> = (0..19).collect();
    assert_eq!(calc_stats(&samples).unwrap().p95, 18);
}

#[test]
fn test_mean_is_float() {
    let stats = calc_stats(&[1, 2]).unwrap();
    assert_eq!(stats.avg, 1.5);
}

#[test]
fn test_report_counts_over_mixed_outcomes() {
    let mut lines = Vec::new();
    for (i, tx) in ["0x1", "0x2", "0x3"].iter().enumerate() {
        lines.push(event("SENDING", tx, 1_000 + i as i64 * 100));
        lines.push(event("SENT", tx, 1_050 + i as i64 * 100));
    }
    lines.push(event("BEST_BLOCK", "0x1", 3_000));
    lines.push(event("FINALIZED", "0x1", 9_000));
    lines.push(event("FAILED_TO_REACH_BEST_BLOCK", "0x2", 30_000));
    lines.push(event("BEST_BLOCK", "0x3", 3_200));
    lines.push(event("FAILED_TO_FINALIZE", "0x3", 60_000));

    let report = analyze_traces(&build_traces(&lines));

    assert_eq!(report.total_transactions, 3);
    assert_eq!(report.sent_count, 3);
    assert_eq!(report.best_block_count, 2);
    assert_eq!(report.finalized_count, 1);
    assert_eq!(report.failed_best_block_count, 1);
    assert_eq!(report.failed_finalize_count, 1);
    assert_eq!(report.submission_latency_ms.unwrap().count, 3);
    assert_eq!(report.finalization_latency_ms.unwrap().count, 1);
}
