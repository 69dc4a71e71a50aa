//! # EmailJS Provider
//!
//! Secondary delivery through the EmailJS REST endpoint.
//!
//! The message itself is assembled by a template stored at EmailJS; this
//! adapter only supplies `template_params`. The PDF is passed as a base64
//! data URL in the `attachment` parameter, for use as a variable attachment.
//! EmailJS answers HTTP 200 with a plain-text `OK` and no message id, so the
//! receipt carries a synthetic id derived from the proposal.

use crate::domain::entities::proposal::PricedProposal;
use crate::domain::value_objects::{EmailAddress, ProviderId};
use crate::infrastructure::delivery::content::{EmailContent, SenderIdentity};
use crate::infrastructure::delivery::error::{ProviderError, ProviderResult};
use crate::infrastructure::delivery::http_client::HttpClient;
use crate::infrastructure::delivery::traits::{DEFAULT_TIMEOUT_MS, DeliveryProvider, ProviderReceipt};
use crate::infrastructure::rendering::traits::RenderedDocument;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Default EmailJS send endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Configuration for [`EmailJsProvider`].
#[derive(Clone)]
pub struct EmailJsConfig {
    service_id: String,
    template_id: String,
    public_key: String,
    private_key: Option<String>,
    endpoint: String,
    timeout_ms: u64,
}

impl EmailJsConfig {
    /// Creates a configuration with the default endpoint and timeout.
    #[must_use]
    pub fn new(
        service_id: impl Into<String>,
        template_id: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            template_id: template_id.into(),
            public_key: public_key.into(),
            private_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Sets the private key sent as `accessToken`.
    #[must_use]
    pub fn with_private_key(mut self, private_key: impl Into<String>) -> Self {
        self.private_key = Some(private_key.into());
        self
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
}

impl fmt::Debug for EmailJsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailJsConfig")
            .field("service_id", &self.service_id)
            .field("template_id", &self.template_id)
            .field("public_key", &"[REDACTED]")
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .field("endpoint", &self.endpoint)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: BTreeMap<&'static str, String>,
}

/// Flattens a proposal into template variables.
#[must_use]
pub fn template_params(
    proposal: &PricedProposal,
    recipient: &EmailAddress,
    document: &RenderedDocument,
    sender: &SenderIdentity,
) -> BTreeMap<&'static str, String> {
    let content = EmailContent::compose(proposal, sender);
    let add_ons = proposal
        .add_ons()
        .iter()
        .map(|a| format!("{} ({}, {})", a.name, a.price, a.kind))
        .collect::<Vec<_>>()
        .join(", ");

    let mut params = BTreeMap::new();
    params.insert("to_email", recipient.to_string());
    params.insert("to_name", proposal.client_name().to_string());
    params.insert("company", proposal.company().to_string());
    params.insert("from_name", sender.from_name.clone());
    params.insert(
        "reply_to",
        sender
            .reply_to
            .as_ref()
            .unwrap_or(&sender.from_address)
            .to_string(),
    );
    params.insert("subject", content.subject);
    params.insert("message_html", content.html);
    params.insert("proposal_reference", proposal.id().reference());
    params.insert("package_name", proposal.package_name().to_string());
    params.insert("deliverables", proposal.deliverables().join("\n"));
    params.insert("add_ons", add_ons);
    params.insert("payment_term", proposal.payment_term().label().to_string());
    params.insert("monthly_investment", proposal.raw_monthly().to_string());
    params.insert("discount_percent", proposal.discount_percent().to_string());
    params.insert("discounted_monthly", proposal.discounted_monthly().to_string());
    params.insert("first_payment", proposal.first_payment().to_string());
    params.insert("one_time_total", proposal.one_time_total().to_string());
    params.insert(
        "estimated_prospects",
        proposal.estimated_prospects().to_string(),
    );
    params.insert("proposal_date", proposal.generated_at().to_long_date());
    params.insert("attachment_name", document.filename().to_string());
    params.insert(
        "attachment",
        format!(
            "data:{};base64,{}",
            document.content_type(),
            document.to_base64()
        ),
    );
    params
}

/// EmailJS-backed [`DeliveryProvider`].
#[derive(Debug)]
pub struct EmailJsProvider {
    id: ProviderId,
    config: EmailJsConfig,
    sender: SenderIdentity,
    http: HttpClient,
}

impl EmailJsProvider {
    /// Creates the provider.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InternalError` if the HTTP client cannot be
    /// built.
    pub fn new(id: ProviderId, config: EmailJsConfig, sender: SenderIdentity) -> ProviderResult<Self> {
        let http = HttpClient::new(config.timeout_ms)?;
        Ok(Self {
            id,
            config,
            sender,
            http,
        })
    }
}

#[async_trait]
impl DeliveryProvider for EmailJsProvider {
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
        let request = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            access_token: self.config.private_key.as_deref(),
            template_params: template_params(proposal, recipient, document, &self.sender),
        };

        debug!(provider = %self.id, proposal = %proposal.id(), "Posting proposal to EmailJS");

        let (status, body) = self
            .http
            .post_for_text(&self.config.endpoint, &request, HeaderMap::new())
            .await?;

        if status != StatusCode::OK {
            return Err(ProviderError::rejected(status.as_u16(), body));
        }
        Ok(ProviderReceipt::new(format!("emailjs:{}", proposal.id())))
    }
}
