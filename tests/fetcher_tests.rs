use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use pretty_assertions::assert_eq;
use txbench_suite::loki::{fetch_lines, LogEntry, LogStream, PageSource};
use txbench_suite::utils::error::FetchError;

/// Page source fed from a script of prepared pages, recording every call
struct ScriptedSource {
    pages: RefCell<VecDeque<Result<Vec<LogStream>, FetchError>>>,
    calls: RefCell<Vec<(i64, i64, usize)>>,
}

impl ScriptedSource {
    fn new(pages: Vec<Result<Vec<LogStream>, FetchError>>) -> Self {
        Self {
            pages: RefCell::new(pages.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(i64, i64, usize)> {
        self.calls.borrow().clone()
    }
}

impl PageSource for ScriptedSource {
    fn fetch_page(
        &self,
        _query: &str,
        start_ns: i64,
        end_ns: i64,
        limit: usize,
    ) -> Result<Vec<LogStream>, FetchError> {
        self.calls.borrow_mut().push((start_ns, end_ns, limit));
        self.pages
            .borrow_mut()
            .pop_front()
            .expect("fetcher requested more pages than scripted")
    }
}

fn stream(entries: &[(i64, &str)]) -> LogStream {
    LogStream {
        stream: HashMap::new(),
        values: entries
            .iter()
            .map(|(ts, line)| (ts.to_string(), line.to_string()))
            .collect(),
    }
}

fn collect_ok(iter: impl Iterator<Item = Result<LogEntry, FetchError>>) -> Vec<LogEntry> {
    iter.map(|entry| entry.expect("unexpected fetch error"))
        .collect()
}

#[test]
fn test_two_page_fetch_combines_pages_in_order() {
    // Page 1 is exactly `limit` entries, page 2 is short
    let source = ScriptedSource::new(vec![
        Ok(vec![stream(&[(100, "a"), (200, "b"), (300, "c")])]),
        Ok(vec![stream(&[(301, "d"), (400, "e")])]),
    ]);

    let entries = collect_ok(fetch_lines(&source, "{host=\"n1\"}", 0, 1_000, 3));

    let timestamps: Vec<i64> = entries.iter().map(|e| e.timestamp_ns).collect();
    assert_eq!(timestamps, vec![100, 200, 300, 301, 400]);

    // The second query starts one nanosecond past the page-1 boundary
    assert_eq!(source.calls(), vec![(0, 1_000, 3), (301, 1_000, 3)]);
}

#[test]
fn test_empty_first_page_yields_empty_sequence() {
    let source = ScriptedSource::new(vec![Ok(vec![])]);

    let entries = collect_ok(fetch_lines(&source, "{host=\"n1\"}", 0, 1_000, 100));

    assert!(entries.is_empty());
    assert_eq!(source.calls().len(), 1);
}

#[test]
fn test_short_first_page_stops_after_one_call() {
    let source = ScriptedSource::new(vec![Ok(vec![stream(&[(5, "only")])])]);

    let entries = collect_ok(fetch_lines(&source, "q", 0, 1_000, 100));

    assert_eq!(entries.len(), 1);
    assert_eq!(source.calls().len(), 1);
}

#[test]
fn test_streams_merge_into_single_ordering() {
    // Two streams in one page, interleaved timestamps
    let source = ScriptedSource::new(vec![Ok(vec![
        stream(&[(10, "n1-a"), (30, "n1-b")]),
        stream(&[(20, "n2-a"), (40, "n2-b")]),
    ])]);

    let entries = collect_ok(fetch_lines(&source, "q", 0, 1_000, 100));

    let lines: Vec<&str> = entries.iter().map(|e| e.line.as_str()).collect();
    assert_eq!(lines, vec!["n1-a", "n2-a", "n1-b", "n2-b"]);
}

#[test]
fn test_boundary_tick_entries_are_skipped_on_next_page() {
    // Page 1 fills the limit and ends on timestamp 300; a second entry at
    // 300 exists upstream but the next query starts at 301, so it is lost.
    // Documented pagination gap, reproduced deliberately.
    let source = ScriptedSource::new(vec![
        Ok(vec![stream(&[(100, "a"), (300, "b"), (300, "c")])]),
        Ok(vec![stream(&[(301, "e")])]),
    ]);

    let entries = collect_ok(fetch_lines(&source, "q", 0, 1_000, 3));

    let lines: Vec<&str> = entries.iter().map(|e| e.line.as_str()).collect();
    assert_eq!(lines, vec!["a", "b", "c", "e"]);
    assert_eq!(source.calls()[1].0, 301);
}

#[test]
fn test_full_page_ending_at_interval_end_stops() {
    // Advancing the cursor past `end` terminates without another query
    let source = ScriptedSource::new(vec![Ok(vec![stream(&[(900, "a"), (1_000, "b")])])]);

    let entries = collect_ok(fetch_lines(&source, "q", 0, 1_000, 2));

    assert_eq!(entries.len(), 2);
    assert_eq!(source.calls().len(), 1);
}

#[test]
fn test_transport_error_is_fatal() {
    let source = ScriptedSource::new(vec![
        Ok(vec![stream(&[(100, "a"), (200, "b")])]),
        Err(FetchError::QueryFailed("error".to_string())),
    ]);

    let mut iter = fetch_lines(&source, "q", 0, 1_000, 2);

    assert_eq!(iter.next().unwrap().unwrap().line, "a");
    assert_eq!(iter.next().unwrap().unwrap().line, "b");
    assert!(iter.next().unwrap().is_err());
    assert!(iter.next().is_none());
}

#[test]
fn test_malformed_timestamp_is_fatal() {
    let source = ScriptedSource::new(vec![Ok(vec![LogStream {
        stream: HashMap::new(),
        values: vec![("not-a-number".to_string(), "line".to_string())],
    }])]);

    let mut iter = fetch_lines(&source, "q", 0, 1_000, 100);

    match iter.next() {
        Some(Err(FetchError::MalformedResponse { .. })) => {}
        other => panic!("expected malformed response error, got {other:?}"),
    }
    assert!(iter.next().is_none());
}
