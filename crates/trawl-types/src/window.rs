//! Time windows, bisection and fixed-size partitioning.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::WindowError;

/// A half-open time window `[start, end)` over which a query is scoped.
///
/// Windows are immutable; extraction strategies subdivide them into child
/// windows via [`split`](Self::split) or [`chunks`](Self::chunks). Because
/// the window is half-open, a row stamped exactly at a bisection midpoint
/// belongs to the right child only and is never counted twice.
///
/// Bounds carry full `DateTime` precision, but the query DSL addresses
/// whole seconds: sub-second precision is truncated when a window is
/// rendered into a `SINCE`/`UNTIL` clause (see
/// [`QueryTemplate::render`](crate::QueryTemplate::render)). Split
/// midpoints are always second-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start instant (inclusive).
    pub start: DateTime<Utc>,
    /// End instant (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new window, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, WindowError> {
        if start > end {
            return Err(WindowError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// The narrowest span that can still be split into two expressible
    /// sub-windows.
    ///
    /// The query DSL renders timestamps at second resolution, so a one
    /// second window is the smallest sub-window a query can address and a
    /// window under two seconds cannot be halved.
    #[must_use]
    pub fn min_split_span() -> TimeDelta {
        TimeDelta::seconds(2)
    }

    /// Returns the duration covered by this window.
    #[must_use]
    pub fn span(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Returns the midpoint of the window, truncated to whole seconds so
    /// that it is exactly expressible in the query DSL.
    #[must_use]
    pub fn midpoint(&self) -> DateTime<Utc> {
        self.start + TimeDelta::seconds(self.span().num_seconds() / 2)
    }

    /// Splits the window at its midpoint into two strictly smaller halves.
    ///
    /// Returns `None` when the window is at or below
    /// [`min_split_span`](Self::min_split_span), the base case that stops
    /// bisection from recursing forever on a window it can no longer
    /// subdivide.
    #[must_use]
    pub fn split(&self) -> Option<(Self, Self)> {
        if self.span() < Self::min_split_span() {
            return None;
        }
        let mid = self.midpoint();
        if mid <= self.start || mid >= self.end {
            return None;
        }
        Some((
            Self {
                start: self.start,
                end: mid,
            },
            Self {
                start: mid,
                end: self.end,
            },
        ))
    }

    /// Partitions `[start, end)` into consecutive sub-windows of length
    /// `chunk`, the final sub-window clipped to `end`.
    ///
    /// The partition is deterministic and total: every instant in the
    /// window belongs to exactly one sub-window.
    ///
    /// # Errors
    ///
    /// Returns an error if `chunk` is shorter than one second.
    pub fn chunks(&self, chunk: TimeDelta) -> Result<ChunkIter, WindowError> {
        if chunk < TimeDelta::seconds(1) {
            return Err(WindowError::InvalidChunk(chunk));
        }
        Ok(ChunkIter {
            current: self.start,
            end: self.end,
            chunk,
        })
    }

    /// Returns true if the window contains the given instant.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Iterator over the fixed-size sub-windows of a [`TimeWindow`].
#[derive(Debug, Clone)]
pub struct ChunkIter {
    current: DateTime<Utc>,
    end: DateTime<Utc>,
    chunk: TimeDelta,
}

impl Iterator for ChunkIter {
    type Item = TimeWindow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.end {
            return None;
        }
        let next = (self.current + self.chunk).min(self.end);
        let window = TimeWindow {
            start: self.current,
            end: next,
        };
        self.current = next;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current >= self.end {
            return (0, Some(0));
        }
        // Both are positive: current < end and chunks() rejects chunks
        // under one second.
        let remaining = (self.end - self.current).num_milliseconds() as u64;
        let chunk = self.chunk.num_milliseconds() as u64;
        let n = remaining.div_ceil(chunk) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for ChunkIter {}
