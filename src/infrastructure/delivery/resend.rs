//! # Resend Provider
//!
//! Primary delivery through the Resend HTTP API.
//!
//! One `POST` with a bearer key. The PDF travels base64-encoded in the
//! `attachments` array; a 2xx response carries the message `id`.

use crate::domain::entities::proposal::PricedProposal;
use crate::domain::value_objects::{EmailAddress, ProviderId};
use crate::infrastructure::delivery::content::{EmailContent, SenderIdentity};
use crate::infrastructure::delivery::error::{ProviderError, ProviderResult};
use crate::infrastructure::delivery::http_client::HttpClient;
use crate::infrastructure::delivery::traits::{DEFAULT_TIMEOUT_MS, DeliveryProvider, ProviderReceipt};
use crate::infrastructure::rendering::traits::RenderedDocument;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Default Resend endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.resend.com/emails";

/// Configuration for [`ResendProvider`].
#[derive(Clone)]
pub struct ResendConfig {
    api_key: String,
    endpoint: String,
    timeout_ms: u64,
}

impl ResendConfig {
    /// Creates a configuration with the default endpoint and timeout.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Overrides the endpoint URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Overrides the per-attempt timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for ResendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResendConfig")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: String,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    attachments: [Attachment<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Attachment<'a> {
    filename: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// Resend-backed [`DeliveryProvider`].
#[derive(Debug)]
pub struct ResendProvider {
    id: ProviderId,
    config: ResendConfig,
    sender: SenderIdentity,
    http: HttpClient,
}

impl ResendProvider {
    /// Creates the provider.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InternalError` if the HTTP client cannot be
    /// built.
    pub fn new(id: ProviderId, config: ResendConfig, sender: SenderIdentity) -> ProviderResult<Self> {
        let http = HttpClient::new(config.timeout_ms)?;
        Ok(Self {
            id,
            config,
            sender,
            http,
        })
    }

    fn headers(&self) -> ProviderResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key))
            .map_err(|_| ProviderError::invalid_request("API key is not a valid header value"))?;
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }
}

#[async_trait]
impl DeliveryProvider for ResendProvider {
    fn provider_id(&self) -> &ProviderId {
        &self.id
    }

    fn timeout_ms(&self) -> u64 {
        self.config.timeout_ms
    }

    async fn send(
        &self,
        proposal: &PricedProposal,
        recipient: &EmailAddress,
        document: &RenderedDocument,
    ) -> ProviderResult<ProviderReceipt> {
        let content = EmailContent::compose(proposal, &self.sender);
        let request = SendEmailRequest {
            from: self.sender.mailbox(),
            to: [recipient.as_str()],
            subject: &content.subject,
            html: &content.html,
            text: &content.text,
            reply_to: self.sender.reply_to.as_ref().map(EmailAddress::as_str),
            attachments: [Attachment {
                filename: document.filename(),
                content: document.to_base64(),
            }],
        };

        debug!(provider = %self.id, proposal = %proposal.id(), "Posting proposal to Resend");

        let response: SendEmailResponse = self
            .http
            .post_json(&self.config.endpoint, &request, self.headers()?)
            .await?;

        if response.id.trim().is_empty() {
            return Err(ProviderError::protocol_error("Response carried an empty id"));
        }
        Ok(ProviderReceipt::new(response.id))
    }
}
