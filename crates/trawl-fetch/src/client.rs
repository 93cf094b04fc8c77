//! HTTP client for the analytics query endpoint.

use std::env;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;
use trawl_types::{ExtractError, Result, ResultSet};

use crate::QueryTransport;
use crate::envelope::{Decoded, QueryEnvelope};

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "NEW_RELIC_API_KEY";
/// Environment variable holding the account id.
pub const ENV_ACCOUNT_ID: &str = "NEW_RELIC_ACCOUNT_ID";
/// Environment variable overriding the query endpoint.
pub const ENV_ENDPOINT: &str = "NEW_RELIC_API_ENDPOINT";

const DEFAULT_ENDPOINT: &str = "https://api.newrelic.com/graphql";

/// Retry policy for transport-level failures.
///
/// Consumed by [`QueryClient`] for every request; application-level errors
/// reported by the remote source are never retried, since resending a
/// rejected query is not expected to succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Creates a fixed-delay policy.
    #[must_use]
    pub const fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    /// Three attempts with a two second pause, matching the observed
    /// deployment.
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(2))
    }
}

/// Configuration for the query client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Query endpoint URL.
    pub endpoint: String,
    /// API key sent in the `API-Key` header.
    pub api_key: String,
    /// Account the queries are scoped to.
    pub account_id: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Retry policy for transport-level failures.
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Creates a configuration with the default endpoint, timeout and
    /// retry policy.
    pub fn new(api_key: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            account_id: account_id.into(),
            timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
        }
    }

    /// Loads credentials from the environment, reading a `.env` file when
    /// one is present.
    ///
    /// # Errors
    ///
    /// Returns an error if [`ENV_API_KEY`] or [`ENV_ACCOUNT_ID`] is unset.
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let api_key = env::var(ENV_API_KEY).map_err(|_| ConfigError::MissingVar(ENV_API_KEY))?;
        let account_id =
            env::var(ENV_ACCOUNT_ID).map_err(|_| ConfigError::MissingVar(ENV_ACCOUNT_ID))?;
        let mut config = Self::new(api_key, account_id);
        if let Ok(endpoint) = env::var(ENV_ENDPOINT) {
            config.endpoint = endpoint;
        }
        Ok(config)
    }
}

/// Errors raised while loading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is unset.
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),
}

/// Transport-level failures, retried up to the configured budget.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Network-level failure (connect, timeout, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// Response body did not match the expected envelope shape.
    #[error("malformed response envelope: {0}")]
    Envelope(String),
}

/// One attempt's failure, split by whether a retry can help.
#[derive(Debug)]
pub(crate) enum SendFailure {
    /// Transport-level failure; retryable.
    Transport(TransportError),
    /// Application-level error from the remote source; not retryable.
    Remote(String),
}

/// HTTP client for the analytics GraphQL endpoint.
///
/// Wraps each query in the GraphQL document the endpoint expects and
/// decodes the response envelope into rows. Transport-level failures are
/// retried per the configured [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct QueryClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl QueryClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> std::result::Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("trawl/{}", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn post_once(&self, query: &str) -> std::result::Result<ResultSet, SendFailure> {
        let payload = json!({
            "query": graphql_document(query, &self.config.account_id),
        });
        let response = self
            .client
            .post(&self.config.endpoint)
            .header("API-Key", &self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SendFailure::Transport(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SendFailure::Transport(TransportError::Status(
                status.as_u16(),
            )));
        }

        let envelope: QueryEnvelope = response
            .json()
            .await
            .map_err(|e| SendFailure::Transport(e.into()))?;
        match envelope.decode() {
            Ok(Decoded::Rows(rows)) => Ok(rows),
            Ok(Decoded::RemoteError(message)) => Err(SendFailure::Remote(message)),
            Err(detail) => Err(SendFailure::Transport(TransportError::Envelope(detail))),
        }
    }
}

#[async_trait]
impl QueryTransport for QueryClient {
    async fn send(&self, query: &str) -> Result<ResultSet> {
        match send_with_retry(&self.config.retry, || self.post_once(query)).await {
            Ok(rows) => Ok(rows),
            Err(SendFailure::Remote(message)) => Err(ExtractError::RemoteQuery { message }),
            Err(SendFailure::Transport(e)) => Err(ExtractError::Transport(e.to_string())),
        }
    }
}

/// Runs one attempt at a time, retrying transport failures per the policy.
///
/// Remote application errors short-circuit: the policy only covers failures
/// where a retry can plausibly change the outcome.
pub(crate) async fn send_with_retry<F, Fut>(
    retry: &RetryPolicy,
    mut attempt_fn: F,
) -> std::result::Result<ResultSet, SendFailure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<ResultSet, SendFailure>>,
{
    let mut attempt = 1;
    loop {
        match attempt_fn().await {
            Ok(rows) => return Ok(rows),
            Err(remote @ SendFailure::Remote(_)) => return Err(remote),
            Err(transport @ SendFailure::Transport(_)) => {
                if attempt >= retry.max_attempts {
                    return Err(transport);
                }
                attempt += 1;
                tokio::time::sleep(retry.delay).await;
            }
        }
    }
}

/// Builds the GraphQL document embedding the rendered query.
///
/// The query ends up inside a GraphQL string literal; JSON string escaping
/// is a superset of what that position accepts, so escape the two
/// characters that matter.
fn graphql_document(query: &str, account_id: &str) -> String {
    let escaped = query.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{{ actor {{ nrql(query: \"{escaped}\", accounts: {account_id}) {{ results }} }} }}")
}
