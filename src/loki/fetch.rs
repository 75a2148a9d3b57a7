//! Cursor-style pagination over the range-query API.
//!
//! Drives repeated range queries for `[current_start, end]` until the
//! interval is exhausted, merging the streams of every page into a single
//! timestamp-ordered sequence. The driver is generic over [`PageSource`] so
//! pagination can be exercised without a network.

use super::types::{LogEntry, LogStream};
use crate::utils::error::FetchError;
use log::debug;
use std::collections::VecDeque;

/// One page worth of raw streams
pub trait PageSource {
    /// Fetch at most `limit` entries for `[start_ns, end_ns]`, ordered forward
    fn fetch_page(
        &self,
        query: &str,
        start_ns: i64,
        end_ns: i64,
        limit: usize,
    ) -> Result<Vec<LogStream>, FetchError>;
}

/// Lazy iterator over every log line in a closed time interval
///
/// Yields entries in non-decreasing timestamp order, one page at a time.
/// Any transport or decoding failure is fatal: the iterator yields the
/// error once and then terminates. Restartable per call, not resumable
/// mid-stream.
pub struct LogLines<'a, S: PageSource> {
    source: &'a S,
    query: String,
    current_start: i64,
    end_ns: i64,
    limit: usize,
    buffer: VecDeque<LogEntry>,
    done: bool,
}

/// Stream all log lines matching `query` within `[start_ns, end_ns]`
///
/// **Public** - main entry point for log fetching
pub fn fetch_lines<'a, S: PageSource>(
    source: &'a S,
    query: &str,
    start_ns: i64,
    end_ns: i64,
    limit: usize,
) -> LogLines<'a, S> {
    LogLines {
        source,
        query: query.to_string(),
        current_start: start_ns,
        end_ns,
        limit,
        buffer: VecDeque::new(),
        done: false,
    }
}

impl<S: PageSource> LogLines<'_, S> {
    /// Fetch and merge the next page into the buffer.
    ///
    /// Returns Ok(true) if entries were buffered, Ok(false) on normal
    /// exhaustion.
    fn fill_buffer(&mut self) -> Result<bool, FetchError> {
        let streams =
            self.source
                .fetch_page(&self.query, self.current_start, self.end_ns, self.limit)?;

        // Several streams can match one query; merge them into one global
        // ordering per page before emitting.
        let mut entries: Vec<LogEntry> = Vec::new();
        for stream in streams {
            for (timestamp, line) in stream.values {
                let timestamp_ns: i64 =
                    timestamp.parse().map_err(|_| FetchError::MalformedResponse {
                        detail: "non-numeric entry timestamp".to_string(),
                        body: timestamp.clone(),
                    })?;
                entries.push(LogEntry { timestamp_ns, line });
            }
        }

        if entries.is_empty() {
            return Ok(false);
        }

        entries.sort_by_key(|entry| entry.timestamp_ns);

        let count = entries.len();
        let last_ts = entries[count - 1].timestamp_ns;

        if count < self.limit {
            // Short page: the interval is fully covered once this page is
            // emitted.
            self.done = true;
        } else {
            // Advance one nanosecond past the last emitted timestamp so the
            // next page does not re-fetch it. Entries sharing that exact
            // timestamp are skipped by the next query: a known data-loss gap
            // at page boundaries, kept for parity with the historical
            // fetcher.
            self.current_start = last_ts + 1;
            if self.current_start > self.end_ns {
                self.done = true;
            }
        }

        debug!(
            "page: {} entries, last_ts={}, next_start={}",
            count, last_ts, self.current_start
        );

        self.buffer.extend(entries);
        Ok(true)
    }
}

impl<S: PageSource> Iterator for LogLines<'_, S> {
    type Item = Result<LogEntry, FetchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(entry) = self.buffer.pop_front() {
            return Some(Ok(entry));
        }

        if self.done {
            return None;
        }

        match self.fill_buffer() {
            Ok(true) => self.buffer.pop_front().map(Ok),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
