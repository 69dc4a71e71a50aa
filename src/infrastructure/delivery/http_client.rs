//! # HTTP Client Utilities
//!
//! Shared HTTP client for the API-based delivery providers.
//!
//! Wraps `reqwest` with a request deadline, JSON bodies and a uniform
//! mapping from transport failures and status codes to [`ProviderError`].
//!
//! # Examples
//!
//! ```ignore
//! use proposal_dispatch::infrastructure::delivery::http_client::HttpClient;
//!
//! let client = HttpClient::new(10_000)?;
//! let response: SendResponse = client.post_json(url, &body, headers).await?;
//! ```

use crate::infrastructure::delivery::error::{ProviderError, ProviderResult};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Longest response body excerpt kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// HTTP client wrapper for provider adapters.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a client whose requests time out after `timeout_ms`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InternalError` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| {
                ProviderError::internal_error(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// POSTs a JSON body and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns a transport or status error, or `ProtocolError` if the
    /// response body is not the expected JSON.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        headers: HeaderMap,
    ) -> ProviderResult<T> {
        let response = self.send_json(url, body, headers).await?;
        let response = self.check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::protocol_error(format!("Failed to parse response: {}", e)))
    }

    /// POSTs a JSON body and returns the response text.
    ///
    /// # Errors
    ///
    /// Returns a transport or status error.
    pub async fn post_for_text<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        headers: HeaderMap,
    ) -> ProviderResult<(StatusCode, String)> {
        let response = self.send_json(url, body, headers).await?;
        let response = self.check_status(response).await?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::protocol_error(format!("Failed to read response: {}", e)))?;
        Ok((status, text))
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        headers: HeaderMap,
    ) -> ProviderResult<Response> {
        self.client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))
    }

    async fn check_status(&self, response: Response) -> ProviderResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_status_error(status, &body))
    }

    fn map_reqwest_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::timeout(self.timeout_ms)
        } else if error.is_connect() {
            ProviderError::connection(format!("Connection failed: {}", error))
        } else {
            ProviderError::connection(format!("HTTP request failed: {}", error))
        }
    }
}

/// Maps a non-success HTTP status to a [`ProviderError`].
#[must_use]
pub fn map_status_error(status: StatusCode, body: &str) -> ProviderError {
    let excerpt: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::authentication(status.as_u16(), excerpt)
        }
        StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited(excerpt),
        _ => ProviderError::rejected(status.as_u16(), excerpt),
    }
}
