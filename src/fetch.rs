//! Remote dictionary fetch with bounded retry.
//!
//! [`DictionaryClient`] downloads the scheme dictionary over HTTP and decodes
//! it with [`crate::dictionary::parse_response`]. Each attempt carries a fresh
//! random `request_id` query parameter so intermediate caches never serve a
//! stale copy. Failed attempts (transport errors including timeouts, non-2xx
//! statuses, malformed payloads) are retried up to
//! [`FetchConfig::max_attempts`] times in total; the last error is returned
//! once attempts run out.
//!
//! # Feature
//!
//! Requires the `fetch` feature.

use std::time::Duration;

use rand::Rng;
use serde_json::Value;

use crate::dictionary::parse_response;
use crate::error::ValidationError;
use crate::scheme::SchemeRule;

/// Dictionary location used when none is configured.
pub const DEFAULT_DICTIONARY_URL: &str =
    "https://sumup-op-hiring-test.s3.eu-west-1.amazonaws.com/api-mock/cards-dictionary.json";

/// Per-attempt timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Total attempts used when none is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Error type for dictionary fetch failures.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP request itself failed (network, DNS, timeout, bad body, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Server Error: {0}")]
    HttpStatus(u16),

    /// The payload was JSON but not a valid dictionary.
    #[error(transparent)]
    Malformed(#[from] ValidationError),
}

impl FetchError {
    /// Returns true if the failure was a per-attempt timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }
}

/// Settings for [`DictionaryClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Dictionary URL. The `request_id` parameter is appended per attempt.
    pub url: String,
    /// Timeout applied to each attempt.
    pub timeout: Duration,
    /// Total number of attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub retry_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DICTIONARY_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::ZERO,
        }
    }
}

impl FetchConfig {
    /// Builder method to set the dictionary URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Builder method to set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method to set the total number of attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Builder method to set the pause between attempts.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

/// Generates a request identifier, uniform in `1..=i64::MAX`.
pub fn generate_request_id() -> u64 {
    rand::thread_rng().gen_range(1..=i64::MAX as u64)
}

/// HTTP client for a scheme dictionary.
pub struct DictionaryClient {
    client: reqwest::Client,
    config: FetchConfig,
}

impl DictionaryClient {
    /// Creates a client with its own connection pool.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, config })
    }

    /// Creates a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: FetchConfig) -> Self {
        Self { client, config }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetches and decodes the dictionary, retrying failed attempts.
    pub async fn fetch_rules(&self) -> Result<Vec<SchemeRule>, FetchError> {
        let attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.try_fetch().await {
                Ok(rules) => {
                    tracing::info!(attempt, schemes = rules.len(), "scheme dictionary fetched");
                    return Ok(rules);
                }
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        attempt,
                        retries_left = attempts - attempt,
                        url = %self.config.url,
                        error = %e,
                        "dictionary fetch attempt failed, retrying"
                    );
                    attempt += 1;
                    if !self.config.retry_delay.is_zero() {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        attempts,
                        url = %self.config.url,
                        error = %e,
                        "dictionary fetch failed after all attempts"
                    );
                    return Err(e);
                }
            }
        }
    }

    /// Executes a single GET and decodes the payload.
    async fn try_fetch(&self) -> Result<Vec<SchemeRule>, FetchError> {
        let request_id = generate_request_id();
        let response = self
            .client
            .get(&self.config.url)
            .query(&[("request_id", request_id)])
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body: Value = response.json().await?;
        Ok(parse_response(&body)?)
    }
}
