//! Hardened HTTP client for remote model endpoints.
//!
//! Shared by the similarity and entailment providers; knows nothing about
//! what the models compute. Implements bounded retry with jittered
//! exponential backoff: jitter shifts *when* a retry happens, never what
//! the call returns, so verdicts stay reproducible.

pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::RemoteError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockModelClient;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::NetworkConfig;

/// A remote model endpoint: JSON in, JSON out.
///
/// The seam the providers are written against; tests swap in
/// [`MockModelClient`].
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Posts `payload` to `model` and returns the decoded JSON response.
    async fn call(&self, model: &str, payload: &Value) -> Result<Value, RemoteError>;
}

/// Production client posting to `{endpoint}/{model}` with bearer auth.
///
/// Stateless per call; the underlying [`reqwest::Client`] provides
/// connection reuse.
#[derive(Debug, Clone)]
pub struct HttpModelClient {
    http: HttpClient,
    network: NetworkConfig,
}

impl HttpModelClient {
    /// Builds a client from the network configuration.
    pub fn new(network: NetworkConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(network.timeout())
            .build()
            .unwrap_or_else(|_| HttpClient::new());
        Self { http, network }
    }

    fn url_for(&self, model: &str) -> String {
        format!("{}/{}", self.network.endpoint.trim_end_matches('/'), model)
    }

    /// One bounded attempt. Separates retryable from fatal outcomes.
    async fn attempt(&self, url: &str, payload: &Value) -> Result<Value, AttemptError> {
        let mut request = self.http.post(url).json(payload);
        if let Some(token) = &self.network.api_token {
            request = request.bearer_auth(token);
        }

        let response = match tokio::time::timeout(self.network.timeout(), request.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(AttemptError::Retryable(format!("transport error: {e}"))),
            Err(_) => {
                return Err(AttemptError::Retryable(format!(
                    "attempt timed out after {}ms",
                    self.network.timeout_ms
                )));
            }
        };

        let status = response.status().as_u16();
        if (200..300).contains(&status) {
            return response
                .json::<Value>()
                .await
                .map_err(|e| AttemptError::Fatal(format!("undecodable JSON body: {e}")));
        }

        if self.network.retryable_statuses.contains(&status) {
            Err(AttemptError::Retryable(format!("retryable status {status}")))
        } else {
            Err(AttemptError::Fatal(format!("non-retryable status {status}")))
        }
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn call(&self, model: &str, payload: &Value) -> Result<Value, RemoteError> {
        let url = self.url_for(model);
        let max_attempts = self.network.max_retries + 1;
        let mut last_reason = String::new();

        // Explicit bounded loop, not recursion: stack depth and cancellation
        // stay trivial.
        for attempt in 0..max_attempts {
            if attempt > 0 {
                let backoff = exponential_backoff(
                    self.network.backoff_base_ms,
                    self.network.backoff_cap_ms,
                    attempt - 1,
                );
                let jitter = fastrand::u64(0..=self.network.jitter_ms);
                let delay = Duration::from_millis(backoff + jitter);
                debug!(
                    model,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying model call"
                );
                tokio::time::sleep(delay).await;
            }

            match self.attempt(&url, payload).await {
                Ok(value) => {
                    debug!(model, attempt, "model call succeeded");
                    return Ok(value);
                }
                Err(AttemptError::Fatal(reason)) => {
                    warn!(model, attempt, reason = %reason, "model call failed fatally");
                    return Err(RemoteError::Unavailable {
                        model: model.to_string(),
                        attempts: attempt + 1,
                        reason,
                    });
                }
                Err(AttemptError::Retryable(reason)) => {
                    warn!(model, attempt, reason = %reason, "model call attempt failed");
                    last_reason = reason;
                }
            }
        }

        Err(RemoteError::Unavailable {
            model: model.to_string(),
            attempts: max_attempts,
            reason: last_reason,
        })
    }
}

enum AttemptError {
    Retryable(String),
    Fatal(String),
}

/// Capped exponential delay for retry `attempt` (0-based), without jitter.
pub(crate) fn exponential_backoff(base_ms: u64, cap_ms: u64, attempt: u32) -> u64 {
    base_ms
        .saturating_mul(1u64 << attempt.min(16))
        .min(cap_ms)
}
