//! Query transport for the trawl log-analytics extractor.
//!
//! This crate provides the single leaf dependency extraction strategies sit
//! on top of:
//!
//! - [`QueryTransport`] - The seam between extractors and the remote source
//! - [`QueryClient`] - HTTP client for the analytics GraphQL endpoint
//! - [`ClientConfig`] / [`RetryPolicy`] - Explicit, testable configuration

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/storetech-ops/trawl/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod envelope;
mod transport;

pub use client::{
    ClientConfig, ConfigError, ENV_ACCOUNT_ID, ENV_API_KEY, ENV_ENDPOINT, QueryClient,
    RetryPolicy, TransportError,
};
pub use transport::QueryTransport;
