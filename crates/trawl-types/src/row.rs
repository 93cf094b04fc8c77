//! Schema-less result rows.

use serde_json::{Map, Value};

/// A single result row: a mapping from field name to scalar value.
///
/// Row shape is determined by the remote source; the extractor treats it as
/// opaque.
pub type ResultRow = Map<String, Value>;

/// An ordered sequence of rows.
///
/// Ordering follows the concatenation order of sub-window fetches, not a
/// global sort.
pub type ResultSet = Vec<ResultRow>;

/// Row count at or above which a single fetch is presumed incomplete.
///
/// The remote source silently stops returning rows for a single query at
/// this count.
pub const DEFAULT_TRUNCATION_THRESHOLD: usize = 5000;
