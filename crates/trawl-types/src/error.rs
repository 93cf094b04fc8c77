//! Error types for trawl.

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

/// Result type alias for trawl operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur during extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Transport-level failure after the retry budget is exhausted.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote source executed the request but reported an application
    /// error. Distinct from an empty-but-valid result, and never retried.
    #[error("remote query error: {message}")]
    RemoteQuery {
        /// Message reported by the remote source.
        message: String,
    },

    /// Invalid window or chunk parameters.
    #[error(transparent)]
    Window(#[from] WindowError),
}

/// Error for invalid time windows and partitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// Start instant is after end instant.
    #[error("invalid time window: {start} > {end}")]
    InvalidWindow {
        /// The start instant.
        start: DateTime<Utc>,
        /// The end instant.
        end: DateTime<Utc>,
    },

    /// Chunk duration is too short to be expressible in the query DSL.
    #[error("chunk duration must be at least one second, got {0}")]
    InvalidChunk(TimeDelta),
}
