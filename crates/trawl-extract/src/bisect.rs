//! Adaptive bisection extraction.

use std::fmt;
use std::sync::Arc;

use trawl_fetch::QueryTransport;
use trawl_types::{DEFAULT_TRUNCATION_THRESHOLD, QueryTemplate, Result, ResultSet, TimeWindow};

use crate::{EventSink, ExtractEvent};

/// Truncation-safe extractor that halves a window whenever a fetch comes
/// back at the truncation threshold.
///
/// The remote source silently caps any single query, so a fetch returning
/// at least the threshold is presumed incomplete: its rows are discarded,
/// the window is split at its midpoint, and both halves are fetched
/// independently. Sub-windows are processed depth-first left to right, so
/// the output concatenation follows the time axis.
///
/// A window that can no longer be split (see
/// [`TimeWindow::min_split_span`]) is accepted as-is even when still at
/// the threshold; the granularity floor is reported as a warning rather
/// than looping forever on a window denser than the source can return.
pub struct Bisection<T> {
    transport: T,
    sink: Arc<dyn EventSink>,
    threshold: usize,
}

impl<T: fmt::Debug> fmt::Debug for Bisection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bisection")
            .field("transport", &self.transport)
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl<T: QueryTransport> Bisection<T> {
    /// Creates an extractor with the default truncation threshold.
    pub fn new(transport: T, sink: Arc<dyn EventSink>) -> Self {
        Self::with_threshold(transport, sink, DEFAULT_TRUNCATION_THRESHOLD)
    }

    /// Creates an extractor presuming truncation at `threshold` rows.
    pub fn with_threshold(transport: T, sink: Arc<dyn EventSink>, threshold: usize) -> Self {
        Self {
            transport,
            sink,
            threshold,
        }
    }

    /// Returns the observability handle events are reported to.
    #[must_use]
    pub fn sink(&self) -> &Arc<dyn EventSink> {
        &self.sink
    }

    /// Fetches the complete result set for `window`.
    ///
    /// Pending sub-windows live on an explicit work stack rather than the
    /// call stack; each split strictly shrinks both children, so the stack
    /// drains in at most `O(span / min_split_span)` fetches even against a
    /// source that reports every window as full.
    ///
    /// # Errors
    ///
    /// Propagates the transport's failure for any sub-window; no partial
    /// result is returned.
    pub async fn fetch(&self, template: &QueryTemplate, window: TimeWindow) -> Result<ResultSet> {
        let mut rows = ResultSet::new();
        let mut pending = vec![window];

        while let Some(current) = pending.pop() {
            let fetched = self.transport.send(&template.render(&current)).await?;
            self.sink.record(ExtractEvent::info(format!(
                "fetched {} rows for {current}",
                fetched.len()
            )));

            if fetched.len() >= self.threshold {
                if let Some((left, right)) = current.split() {
                    self.sink.record(ExtractEvent::warn(format!(
                        "possible truncation, splitting {current}"
                    )));
                    // LIFO: push the right half first so the left half is
                    // fetched next, keeping output in time order.
                    pending.push(right);
                    pending.push(left);
                    continue;
                }
                self.sink.record(ExtractEvent::warn(format!(
                    "{current} is at minimum granularity but still at the truncation \
                     threshold, accepting possibly incomplete rows"
                )));
            }
            rows.extend(fetched);
        }
        Ok(rows)
    }
}
