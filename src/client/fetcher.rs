//! HTTP request client with retry and backoff
//!
//! This module handles all HTTP requests to the catalog API:
//! - Building the reqwest client with the configured timeout
//! - Gating every attempt through the shared `RateGate`
//! - Classifying responses into success, retryable and fatal outcomes
//! - Exponential backoff between retryable attempts

use crate::client::gate::RateGate;
use crate::config::{ApiConfig, RequestConfig};
use crate::FetchError;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;

/// Retry ceiling and backoff schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts allowed, including the first
    pub max_attempts: u32,

    /// Delay after the first failed attempt; doubles each time
    pub backoff_base: Duration,
}

impl RetryPolicy {
    /// Delay to sleep after failed attempt number `attempt` (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl From<&RequestConfig> for RetryPolicy {
    fn from(config: &RequestConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff_base: config.backoff_base(),
        }
    }
}

/// Builds an HTTP client with the per-attempt timeout applied
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use taric_harvest::client::build_http_client;
///
/// let client = build_http_client(Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(timeout: Duration) -> Result<Client, FetchError> {
    Client::builder()
        .user_agent(concat!("taric-harvest/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(FetchError::ClientBuild)
}

/// Rate-limited, retrying GET client
///
/// Cloning is cheap; clones share the underlying connection pool and gate.
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 200 | Return body |
/// | HTTP 429 | Retry after backoff |
/// | HTTP 5xx | Retry after backoff |
/// | Connect/timeout/body error | Retry after backoff |
/// | Any other status | Fail immediately |
#[derive(Debug, Clone)]
pub struct RequestClient {
    http: Client,
    gate: Arc<RateGate>,
    accept: String,
    policy: RetryPolicy,
}

impl RequestClient {
    /// Creates a client from configuration, sharing the given gate
    pub fn new(
        api: &ApiConfig,
        requests: &RequestConfig,
        gate: Arc<RateGate>,
    ) -> Result<Self, FetchError> {
        let http = build_http_client(api.timeout())?;
        Ok(Self::from_parts(
            http,
            gate,
            api.accept.clone(),
            RetryPolicy::from(requests),
        ))
    }

    /// Creates a client from an already-built reqwest client
    pub fn from_parts(
        http: Client,
        gate: Arc<RateGate>,
        accept: impl Into<String>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            http,
            gate,
            accept: accept.into(),
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetches `url`, retrying transient failures
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - Body of the first 200 response
    /// * `Err(FetchError::Api)` - Non-retryable status
    /// * `Err(FetchError::RetriesExhausted)` - Every attempt failed transiently
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut attempt = 0u32;

        loop {
            match self.attempt(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() => {
                    attempt += 1;
                    if attempt >= self.policy.max_attempts {
                        return Err(FetchError::RetriesExhausted {
                            url: url.to_string(),
                            attempts: attempt,
                            last: Box::new(e),
                        });
                    }

                    let delay = self.policy.backoff(attempt - 1);
                    tracing::warn!(
                        "{} (attempt {}/{}), retrying in {:?}",
                        e,
                        attempt,
                        self.policy.max_attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Issues one gated GET and classifies the outcome
    async fn attempt(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.gate.acquire().await;
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .header(ACCEPT, self.accept.as_str())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(FetchError::Throttled {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if status != StatusCode::OK {
            return Err(FetchError::Api {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        Ok(body.to_vec())
    }
}
