//! HTTP client for the inference model services

use std::time::Duration;

use serde::Serialize;
use serde_json::Value as JsonValue;

use super::retry::RetryPolicy;

/// Errors from a model call, after retries are exhausted
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Model service error ({status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse model response: {0}")]
    Decode(String),
}

/// JSON-over-HTTP client shared by all model endpoints
#[derive(Clone)]
pub struct ModelClient {
    http: reqwest::Client,
    retry: RetryPolicy,
}

/// Connection failures and timeouts are worth another attempt
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

impl ModelClient {
    pub fn new(timeout: Duration, retry: RetryPolicy) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(timeout)
            .build()?;

        Ok(Self { http, retry })
    }

    /// POST `body` as JSON and decode the JSON reply, retrying transient failures
    pub async fn post_json<B>(&self, url: &str, body: &B) -> Result<JsonValue, ModelError>
    where
        B: Serialize + ?Sized,
    {
        let mut retry = 0;

        loop {
            let can_retry = retry < self.retry.total;

            match self.http.post(url).json(body).send().await {
                Ok(response) if response.status().is_success() => {
                    let text = response.text().await?;
                    return serde_json::from_str(&text).map_err(|e| ModelError::Decode(e.to_string()));
                }
                Ok(response) if can_retry && self.retry.retries_status(response.status().as_u16()) => {
                    tracing::warn!(
                        url,
                        status = response.status().as_u16(),
                        attempt = retry + 1,
                        "Model service returned retryable status"
                    );
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(ModelError::Status { status, body });
                }
                Err(e) if can_retry && is_transient(&e) => {
                    tracing::warn!(url, error = %e, attempt = retry + 1, "Model request failed, retrying");
                }
                Err(e) => return Err(e.into()),
            }

            retry += 1;
            let backoff = self.retry.backoff(retry);
            if !backoff.is_zero() {
                tokio::time::sleep(backoff).await;
            }
        }
    }
}
