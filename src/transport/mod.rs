// src/transport/mod.rs
// Single-call HTTP wrapper: classification, retry with backoff, uniform result

pub mod classify;
pub mod retry;

pub use classify::{Classification, ErrorEnvelope, FailureKind, classify};
pub use retry::RetryPolicy;

use crate::config::EmnoConfig;
use crate::error::Result;
use crate::http::{create_client, default_headers, merge_headers};
use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// A 2xx response. `data` is `None` when the body was empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Success<T> {
    pub status: u16,
    pub data: Option<T>,
}

/// Outcome of one logical call. The transport never raises; failures come
/// back as an [`ErrorEnvelope`].
pub type CallResult<T> = std::result::Result<Success<T>, ErrorEnvelope>;

/// Stateless HTTP wrapper shared by the resource client and every handle
#[derive(Debug, Clone)]
pub struct Transport {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
    retry: RetryPolicy,
}

impl Transport {
    pub fn new(config: &EmnoConfig) -> Result<Self> {
        Ok(Self {
            client: create_client(config)?,
            base_url: config.normalized_base_url().to_string(),
            headers: default_headers(config)?,
            retry: config.retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Issue `method path` with an optional JSON body, retrying retryable
    /// failures with exponential backoff. The final failure carries an
    /// `attempt:N` entry in `extra` for every attempt made.
    pub async fn call<T, B>(
        &self,
        path: &str,
        method: Method,
        body: Option<&B>,
        headers: Option<&HeaderMap>,
    ) -> CallResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let headers = merge_headers(&self.headers, headers);
        let payload = match body.map(serde_json::to_vec).transpose() {
            Ok(payload) => payload,
            Err(e) => return Err(ErrorEnvelope::encode(&e)),
        };

        let mut trail = Vec::new();
        let mut attempt = 0;

        loop {
            debug!(method = %method, path, attempt, "Sending request");
            let outcome = self
                .attempt(&url, method.clone(), &headers, payload.clone())
                .await;

            let mut envelope = match outcome {
                Ok(success) => return Ok(success),
                Err(envelope) => envelope,
            };

            envelope.extra = std::mem::take(&mut trail);
            envelope.note_attempt(attempt);

            if self.retry.should_retry(attempt, envelope.can_retry) {
                let delay = self.retry.delay_for(attempt);
                warn!(
                    method = %method,
                    path,
                    status = envelope.status,
                    error = %envelope.message,
                    "Transient error, retrying in {:?}...",
                    delay
                );
                trail = envelope.extra;
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            return Err(envelope);
        }
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        url: &str,
        method: Method,
        headers: &HeaderMap,
        payload: Option<Vec<u8>>,
    ) -> CallResult<T> {
        let mut request = self.client.request(method, url).headers(headers.clone());
        if let Some(payload) = payload {
            request = request.body(payload);
        }

        let response = request.send().await.map_err(|e| ErrorEnvelope::network(&e))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| ErrorEnvelope::network(&e))?;

        if !(200..300).contains(&status) {
            return Err(ErrorEnvelope::from_response(status, &text));
        }

        if text.trim().is_empty() {
            return Ok(Success { status, data: None });
        }

        serde_json::from_str(&text)
            .map(|data| Success {
                status,
                data: Some(data),
            })
            .map_err(|e| ErrorEnvelope::decode(status, &e))
    }
}
