//! # SMTP Provider
//!
//! Delivery over plain SMTP with `lettre`, for deployments that relay
//! through their own mail server.
//!
//! The message is `multipart/mixed`: a text/HTML alternative followed by the
//! PDF attachment. The receipt carries the `Message-ID` set on the message.

use crate::domain::entities::proposal::PricedProposal;
use crate::domain::value_objects::{EmailAddress, ProviderId};
use crate::infrastructure::delivery::content::{EmailContent, SenderIdentity};
use crate::infrastructure::delivery::error::{ProviderError, ProviderResult};
use crate::infrastructure::delivery::traits::{DEFAULT_TIMEOUT_MS, DeliveryProvider, ProviderReceipt};
use crate::infrastructure::rendering::traits::RenderedDocument;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// SMTP reply code for rejected credentials.
const AUTH_FAILED: u16 = 535;

/// Connection security for the SMTP relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Upgrade a plain connection with STARTTLS (usually port 587).
    #[default]
    StartTls,
    /// Implicit TLS (usually port 465).
    Tls,
    /// No encryption. Local relays and tests only.
    None,
}

/// Configuration for [`SmtpProvider`].
#[derive(Clone)]
pub struct SmtpConfig {
    host: String,
    port: u16,
    username: String,
    password: String,
    security: SmtpSecurity,
    timeout_ms: u64,
}

impl SmtpConfig {
    /// Creates a STARTTLS configuration on port 587.
    #[must_use]
    pub fn new(host: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 587,
            username: username.into(),
            password: password.into(),
            security: SmtpSecurity::StartTls,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Overrides the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Overrides the connection security.
    #[must_use]
    pub fn with_security(mut self, security: SmtpSecurity) -> Self {
        self.security = security;
        self
    }

    /// Overrides the per-attempt timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("security", &self.security)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// SMTP-backed [`DeliveryProvider`].
pub struct SmtpProvider {
    id: ProviderId,
    config: SmtpConfig,
    sender: SenderIdentity,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl fmt::Debug for SmtpProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpProvider")
            .field("id", &self.id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SmtpProvider {
    /// Creates the provider. No connection is opened until the first send.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InternalError` if the relay cannot be set up
    /// (for example an invalid TLS host name).
    pub fn new(id: ProviderId, config: SmtpConfig, sender: SenderIdentity) -> ProviderResult<Self> {
        let builder = match config.security {
            SmtpSecurity::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| ProviderError::internal_error(format!("SMTP relay setup failed: {}", e)))?,
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| ProviderError::internal_error(format!("SMTP relay setup failed: {}", e)))?,
            SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(Duration::from_millis(config.timeout_ms)))
            .build();

        Ok(Self {
            id,
            config,
            sender,
            transport,
        })
    }

    /// Builds the MIME message for a proposal.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidRequest` if an address or header
    /// cannot be encoded.
    pub fn build_message(
        &self,
        proposal: &PricedProposal,
        recipient: &EmailAddress,
        document: &RenderedDocument,
    ) -> ProviderResult<(Message, String)> {
        let content = EmailContent::compose(proposal, &self.sender);
        let from = Mailbox::new(
            Some(self.sender.from_name.clone()).filter(|n| !n.trim().is_empty()),
            parse_address(&self.sender.from_address)?,
        );
        let to = Mailbox::new(
            Some(proposal.client_name().to_string()),
            parse_address(recipient)?,
        );
        let domain = self
            .sender
            .from_address
            .as_str()
            .rsplit_once('@')
            .map_or("localhost", |(_, domain)| domain);
        let message_id = format!("<{}@{}>", proposal.id(), domain);

        let content_type = ContentType::parse(document.content_type())
            .map_err(|e| ProviderError::invalid_request(format!("Bad attachment type: {}", e)))?;
        let attachment = Attachment::new(document.filename().to_string())
            .body(document.bytes().to_vec(), content_type);

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .subject(content.subject)
            .message_id(Some(message_id.clone()));
        if let Some(reply_to) = &self.sender.reply_to {
            builder = builder.reply_to(Mailbox::new(None, parse_address(reply_to)?));
        }

        let message = builder
            .multipart(
                MultiPart::mixed()
                    .multipart(MultiPart::alternative_plain_html(content.text, content.html))
                    .singlepart(attachment),
            )
            .map_err(|e| ProviderError::invalid_request(format!("Failed to build message: {}", e)))?;

        Ok((message, message_id))
    }
}

fn parse_address(address: &EmailAddress) -> ProviderResult<Address> {
    address
        .as_str()
        .parse::<Address>()
        .map_err(|e| ProviderError::invalid_request(format!("Invalid address {}: {}", address, e)))
}

fn map_smtp_error(error: &lettre::transport::smtp::Error, timeout_ms: u64) -> ProviderError {
    if error.is_timeout() {
        return ProviderError::timeout(timeout_ms);
    }
    match error.status().map(u16::from) {
        Some(AUTH_FAILED) => ProviderError::authentication(AUTH_FAILED, error.to_string()),
        Some(code) => ProviderError::rejected(code, error.to_string()),
        None => ProviderError::connection(error.to_string()),
    }
}

#[async_trait]
impl DeliveryProvider for SmtpProvider {
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
        let (message, message_id) = self.build_message(proposal, recipient, document)?;

        debug!(
            provider = %self.id,
            proposal = %proposal.id(),
            host = %self.config.host,
            "Sending proposal over SMTP"
        );

        self.transport
            .send(message)
            .await
            .map_err(|e| map_smtp_error(&e, self.config.timeout_ms))?;

        Ok(ProviderReceipt::new(message_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::delivery::content::tests::{proposal, sender};

    fn provider(port: u16) -> SmtpProvider {
        let config = SmtpConfig::new("127.0.0.1", "user", "secret")
            .with_port(port)
            .with_security(SmtpSecurity::None)
            .with_timeout_ms(1000);
        SmtpProvider::new(ProviderId::new("smtp"), config, sender()).unwrap()
    }

    fn recipient() -> EmailAddress {
        EmailAddress::parse("client@example.com").unwrap()
    }

    #[test]
    fn message_is_mixed_with_pdf_attachment() {
        let proposal = proposal("Acme");
        let document = RenderedDocument::pdf("Acme-Proposal.pdf", b"%PDF-1.3".to_vec());
        let (message, message_id) = provider(2525)
            .build_message(&proposal, &recipient(), &document)
            .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("application/pdf"));
        assert!(raw.contains("Acme-Proposal.pdf"));
        assert!(raw.contains("Subject: Your Growth Proposal from Agency"));
        assert!(raw.contains("Reply-To: sales@agency.test"));
        assert_eq!(message_id, format!("<{}@agency.test>", proposal.id()));
    }

    #[tokio::test]
    async fn unreachable_relay_is_connection_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let document = RenderedDocument::pdf("Acme-Proposal.pdf", b"%PDF".to_vec());
        let error = provider(port)
            .send(&proposal("Acme"), &recipient(), &document)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ProviderError::Connection { .. } | ProviderError::Timeout { .. }
        ));
    }

    #[test]
    fn debug_redacts_password() {
        let config = SmtpConfig::new("smtp.test", "user", "hunter2");
        assert!(!format!("{:?}", config).contains("hunter2"));
    }

    #[test]
    fn security_from_config_value() {
        let security: SmtpSecurity = serde_json::from_str("\"starttls\"").unwrap();
        assert_eq!(security, SmtpSecurity::StartTls);
        let security: SmtpSecurity = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(security, SmtpSecurity::None);
    }
}
