//! Truncation-safe extraction strategies for the trawl log-analytics
//! extractor.
//!
//! This crate provides the two ways of pulling a complete result set out
//! of a source that silently caps single queries:
//!
//! - [`Bisection`] - Halve the window and refetch whenever a result comes
//!   back at the truncation threshold
//! - [`FanOut`] - Pre-partition the window into fixed-size chunks and
//!   query them all concurrently
//! - [`EventSink`] - Explicitly constructed observability handle
//! - [`run_batch`] - Sequential multi-query runner with skip-on-failure

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/storetech-ops/trawl/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod batch;
mod bisect;
mod fanout;
mod sink;
#[cfg(test)]
mod testing;

pub use batch::{DEFAULT_JOB_PAUSE, JobOutcome, QueryJob, run_batch};
pub use bisect::Bisection;
pub use fanout::{DEFAULT_CONCURRENCY, FanOut, PartialExtraction};
pub use sink::{EventLevel, EventSink, ExtractEvent, LogSink, NullSink};
