//! Fixed-grid concurrent fan-out extraction.

use std::fmt;
use std::sync::Arc;

use chrono::TimeDelta;
use futures::stream::{self, Stream, StreamExt};
use trawl_fetch::QueryTransport;
use trawl_types::{QueryTemplate, Result, ResultSet, TimeWindow};

use crate::{EventSink, ExtractEvent};

/// Default bound on in-flight sub-window fetches.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Extractor that pre-partitions a window into fixed-size chunks and
/// queries them all concurrently.
///
/// Trades truncation-safety for latency: no chunk is checked against the
/// truncation threshold, so the strategy is only correct when the caller
/// picks a `chunk` small enough that no sub-window can plausibly reach the
/// source's cap. Results are concatenated in completion order, not
/// submission order.
pub struct FanOut<T> {
    transport: T,
    sink: Arc<dyn EventSink>,
    concurrency: usize,
}

impl<T: fmt::Debug> fmt::Debug for FanOut<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanOut")
            .field("transport", &self.transport)
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

/// Result of a skip-and-report fan-out extraction.
#[derive(Debug, Default)]
pub struct PartialExtraction {
    /// Rows from the sub-windows that succeeded.
    pub rows: ResultSet,
    /// Sub-windows whose fetch failed, in completion order.
    pub failed: Vec<TimeWindow>,
}

impl PartialExtraction {
    /// Returns true if no sub-window failed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl<T: QueryTransport> FanOut<T> {
    /// Creates an extractor with the default concurrency bound.
    pub fn new(transport: T, sink: Arc<dyn EventSink>) -> Self {
        Self::with_concurrency(transport, sink, DEFAULT_CONCURRENCY)
    }

    /// Creates an extractor dispatching at most `concurrency` fetches at a
    /// time.
    pub fn with_concurrency(transport: T, sink: Arc<dyn EventSink>, concurrency: usize) -> Self {
        Self {
            transport,
            sink,
            concurrency: concurrency.max(1),
        }
    }

    /// Fetches all chunks of `window`, failing the whole extraction on the
    /// first sub-window error.
    ///
    /// In-flight sibling fetches are dropped when one fails; no partial
    /// result is returned. Use [`fetch_partial`](Self::fetch_partial) to
    /// keep the survivors instead.
    ///
    /// # Errors
    ///
    /// Returns the chunking error for an invalid `chunk`, or the first
    /// sub-window failure.
    pub async fn fetch(
        &self,
        template: &QueryTemplate,
        window: TimeWindow,
        chunk: TimeDelta,
    ) -> Result<ResultSet> {
        let mut fetches = self.dispatch(template, window, chunk)?;
        let mut rows = ResultSet::new();
        while let Some((sub, result)) = fetches.next().await {
            let fetched = result?;
            self.sink.record(ExtractEvent::info(format!(
                "fetched {} rows for {sub}",
                fetched.len()
            )));
            rows.extend(fetched);
        }
        Ok(rows)
    }

    /// Fetches all chunks of `window`, skipping failed sub-windows and
    /// reporting their identities instead of failing the batch.
    ///
    /// # Errors
    ///
    /// Returns an error only for an invalid `chunk`; per-chunk failures
    /// end up in [`PartialExtraction::failed`].
    pub async fn fetch_partial(
        &self,
        template: &QueryTemplate,
        window: TimeWindow,
        chunk: TimeDelta,
    ) -> Result<PartialExtraction> {
        let mut fetches = self.dispatch(template, window, chunk)?;
        let mut partial = PartialExtraction::default();
        while let Some((sub, result)) = fetches.next().await {
            match result {
                Ok(fetched) => {
                    self.sink.record(ExtractEvent::info(format!(
                        "fetched {} rows for {sub}",
                        fetched.len()
                    )));
                    partial.rows.extend(fetched);
                }
                Err(e) => {
                    self.sink
                        .record(ExtractEvent::warn(format!("skipping {sub}: {e}")));
                    partial.failed.push(sub);
                }
            }
        }
        Ok(partial)
    }

    fn dispatch<'a>(
        &'a self,
        template: &'a QueryTemplate,
        window: TimeWindow,
        chunk: TimeDelta,
    ) -> Result<impl Stream<Item = (TimeWindow, Result<ResultSet>)> + 'a> {
        let chunks = window.chunks(chunk)?;
        Ok(stream::iter(chunks)
            .map(move |sub| {
                let query = template.render(&sub);
                async move { (sub, self.transport.send(&query).await) }
            })
            .buffer_unordered(self.concurrency))
    }
}
