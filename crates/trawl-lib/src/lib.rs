//! Truncation-safe extraction of complete result sets from a log-analytics
//! source.
//!
//! The remote source silently caps any single query at a fixed row count.
//! This facade re-exports the two strategies that work around it, the
//! transport they sit on, and the core types.
//!
//! # Quick Start
//!
//! ```ignore
//! use trawl_lib::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = QueryClient::new(ClientConfig::from_env()?)?;
//!     let extractor = Bisection::new(client, Arc::new(LogSink));
//!
//!     let window = TimeWindow::new(
//!         "2024-06-01T00:00:00Z".parse()?,
//!         "2024-06-01T23:59:59Z".parse()?,
//!     )?;
//!     let template = QueryTemplate::new(
//!         "FROM Log_RFID SELECT sbu, store LIMIT MAX ORDER BY timestamp ASC",
//!     );
//!
//!     let rows = extractor.fetch(&template, window).await?;
//!     println!("extracted {} rows", rows.len());
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/storetech-ops/trawl/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use trawl_types::*;

// Re-export the transport
pub use trawl_fetch::{
    ClientConfig, ConfigError, QueryClient, QueryTransport, RetryPolicy, TransportError,
};

// Re-export extraction strategies
pub use trawl_extract::{
    Bisection, EventLevel, EventSink, ExtractEvent, FanOut, JobOutcome, LogSink, NullSink,
    PartialExtraction, QueryJob, run_batch,
};

/// Prelude module for convenient imports.
///
/// ```
/// use trawl_lib::prelude::*;
/// ```
pub mod prelude {
    pub use trawl_types::{
        ExtractError, QueryTemplate, Result, ResultRow, ResultSet, TimeWindow, WindowError,
    };

    pub use trawl_fetch::{ClientConfig, QueryClient, QueryTransport, RetryPolicy};

    pub use trawl_extract::{
        Bisection, EventSink, FanOut, LogSink, NullSink, PartialExtraction, QueryJob, run_batch,
    };
}
