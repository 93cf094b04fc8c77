//! The transport seam between extraction strategies and the remote source.

use async_trait::async_trait;
use trawl_types::{Result, ResultSet};

/// Sends one time-bounded query to the remote analytics source.
///
/// The query text already embeds its window bounds; implementations own the
/// wire format, authentication, and transport-level retries. Extraction
/// strategies depend only on this trait, which keeps them testable against
/// in-memory fakes.
#[async_trait]
pub trait QueryTransport: Send + Sync {
    /// Sends a single query and returns its rows.
    ///
    /// An empty `ResultSet` is a valid outcome and must not be confused
    /// with [`ExtractError::RemoteQuery`](trawl_types::ExtractError), which
    /// signals that the remote source rejected or failed the query.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Transport`](trawl_types::ExtractError) when
    /// the request cannot be completed after retries, and
    /// [`ExtractError::RemoteQuery`](trawl_types::ExtractError) when the
    /// remote source reports an application-level error.
    async fn send(&self, query: &str) -> Result<ResultSet>;
}

#[async_trait]
impl<T: QueryTransport + ?Sized> QueryTransport for std::sync::Arc<T> {
    async fn send(&self, query: &str) -> Result<ResultSet> {
        (**self).send(query).await
    }
}
