//! Shared HTTP client.
//!
//! Wraps reqwest with the cross-cutting call policy every adapter uses: a
//! bounded retry loop with fixed backoffs, 404 as a terminal state, a
//! politeness delay after every success, and a shared request counter.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::{HttpConfig, RetryPolicy, api};
use crate::error::{ClientError, ClientResult};

/// HTTP client shared by all provider adapters.
///
/// Cloning is cheap; clones share the underlying connection pool and the
/// request counter, so a run's total request count is observable in one place
/// without process-wide state.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    requests: Arc<AtomicU64>,
}

impl HttpClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &HttpConfig) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            api::USER_AGENT.parse().expect("valid user-agent header"),
        );

        if let Some(ref key) = config.api_key {
            headers.insert("x-api-key", key.parse()?);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        Ok(Self { client, requests: Arc::new(AtomicU64::new(0)) })
    }

    /// Total requests issued so far, across all clones.
    #[must_use]
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Make a GET request under the given retry policy.
    ///
    /// The call state machine: attempt, then on 429 sleep the rate-limit
    /// backoff and retry, on 404 return immediately, on any other failure
    /// sleep the transport backoff and retry. Exceeding the budget yields
    /// `RetryBudgetExhausted`. A successful call sleeps the politeness delay
    /// before returning so the caller's next request is paced.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` on 404, `RetryBudgetExhausted` once the budget is
    /// spent; never surfaces an intermediate retryable error.
    pub async fn get<T>(
        &self,
        url: &str,
        params: &[(String, String)],
        policy: &RetryPolicy,
    ) -> ClientResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut attempt: u32 = 0;

        loop {
            self.requests.fetch_add(1, Ordering::Relaxed);

            let err = match self.attempt(url, params, policy).await {
                Ok(value) => {
                    tokio::time::sleep(policy.politeness_delay).await;
                    return Ok(value);
                }
                Err(err @ ClientError::NotFound { .. }) => return Err(err),
                Err(err) => err,
            };

            if attempt >= policy.max_retries {
                tracing::warn!(url, attempts = attempt + 1, error = %err, "retry budget exhausted");
                return Err(ClientError::RetryBudgetExhausted { attempts: attempt + 1 });
            }

            let backoff = if matches!(err, ClientError::RateLimited { .. }) {
                policy.rate_limit_backoff
            } else {
                policy.transport_backoff
            };

            attempt += 1;
            tracing::warn!(
                url,
                attempt,
                max_retries = policy.max_retries,
                backoff_ms = backoff.as_millis() as u64,
                error = %err,
                "request failed, retrying"
            );
            tokio::time::sleep(backoff).await;
        }
    }

    /// One attempt: send, map the status, parse the body.
    async fn attempt<T>(
        &self,
        url: &str,
        params: &[(String, String)],
        policy: &RetryPolicy,
    ) -> ClientResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .get(url)
            .query(params)
            .timeout(policy.request_timeout)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let value: serde_json::Value = response.json().await?;
            return serde_json::from_value(value).map_err(ClientError::from);
        }

        match status.as_u16() {
            429 => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(policy.rate_limit_backoff.as_secs());

                Err(ClientError::rate_limited(retry_after))
            }
            404 => Err(ClientError::not_found(url)),
            500..=599 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::server(status.as_u16(), text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
            }
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").field("requests", &self.request_count()).finish()
    }
}
