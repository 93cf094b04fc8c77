//! Core types for the trawl log-analytics extractor.
//!
//! This crate provides the fundamental data structures used throughout
//! trawl:
//!
//! - [`TimeWindow`] - A half-open time window with bisection and
//!   fixed-size partitioning
//! - [`QueryTemplate`] - An opaque query with a time-window clause
//! - [`ResultRow`] / [`ResultSet`] - Schema-less rows as returned by the
//!   remote source
//! - [`ExtractError`] - The error taxonomy shared across the workspace

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/storetech-ops/trawl/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod query;
mod row;
mod window;

pub use error::{ExtractError, Result, WindowError};
pub use query::QueryTemplate;
pub use row::{DEFAULT_TRUNCATION_THRESHOLD, ResultRow, ResultSet};
pub use window::{ChunkIter, TimeWindow};
