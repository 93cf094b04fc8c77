//! In-memory transports for exercising extraction strategies.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Value, json};
use trawl_fetch::QueryTransport;
use trawl_types::{ExtractError, Result, ResultRow, ResultSet, TimeWindow};

/// Parses the `SINCE`/`UNTIL` clause back out of a rendered query.
pub(crate) fn parse_window(query: &str) -> TimeWindow {
    fn instant(text: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc()
    }
    let since = clause_value(query, "SINCE '");
    let until = clause_value(query, "UNTIL '");
    TimeWindow::new(instant(since), instant(until)).unwrap()
}

fn clause_value<'a>(query: &'a str, prefix: &str) -> &'a str {
    query
        .split(prefix)
        .nth(1)
        .unwrap()
        .split('\'')
        .next()
        .unwrap()
}

enum FakeBehavior {
    /// Serves the events whose timestamps fall inside the queried window,
    /// truncated at the cap like the real source.
    Events(Vec<DateTime<Utc>>),
    /// Returns exactly `cap` rows for any window, however narrow.
    AlwaysFull,
}

/// A transport serving synthetic rows tagged with their timestamp.
pub(crate) struct FakeTransport {
    behavior: FakeBehavior,
    cap: usize,
    calls: AtomicUsize,
    fail_containing: Option<DateTime<Utc>>,
}

impl FakeTransport {
    /// Serves `events` (sorted ascending), truncating any single fetch at
    /// `cap` rows.
    pub(crate) fn with_events(mut events: Vec<DateTime<Utc>>, cap: usize) -> Self {
        events.sort_unstable();
        Self {
            behavior: FakeBehavior::Events(events),
            cap,
            calls: AtomicUsize::new(0),
            fail_containing: None,
        }
    }

    /// Pathological source: every window, however narrow, comes back at
    /// the cap.
    pub(crate) fn always_full(cap: usize) -> Self {
        Self {
            behavior: FakeBehavior::AlwaysFull,
            cap,
            calls: AtomicUsize::new(0),
            fail_containing: None,
        }
    }

    /// Fails any query whose window contains `instant` with a remote
    /// query error.
    pub(crate) fn failing_for(mut self, instant: DateTime<Utc>) -> Self {
        self.fail_containing = Some(instant);
        self
    }

    /// Number of queries received so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn row_for(instant: DateTime<Utc>) -> ResultRow {
    let mut row = ResultRow::new();
    row.insert("timestamp".to_string(), json!(instant.timestamp_millis()));
    row
}

/// Reads the timestamps back out of a result set.
pub(crate) fn timestamps(rows: &ResultSet) -> Vec<DateTime<Utc>> {
    rows.iter()
        .map(|row| match &row["timestamp"] {
            Value::Number(n) => DateTime::from_timestamp_millis(n.as_i64().unwrap()).unwrap(),
            other => panic!("unexpected timestamp value: {other}"),
        })
        .collect()
}

#[async_trait]
impl QueryTransport for FakeTransport {
    async fn send(&self, query: &str) -> Result<ResultSet> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let window = parse_window(query);

        if let Some(bad) = self.fail_containing
            && window.contains(bad)
        {
            return Err(ExtractError::RemoteQuery {
                message: format!("synthetic failure for {window}"),
            });
        }

        match &self.behavior {
            FakeBehavior::Events(events) => Ok(events
                .iter()
                .filter(|instant| window.contains(**instant))
                .take(self.cap)
                .map(|instant| row_for(*instant))
                .collect()),
            FakeBehavior::AlwaysFull => {
                Ok((0..self.cap).map(|_| row_for(window.start)).collect())
            }
        }
    }
}
