//! # Delivery Providers
//!
//! Email service adapters behind the [`DeliveryProvider`] port.
//!
//! | Provider | Transport | Success signal |
//! |----------|-----------|----------------|
//! | [`ResendProvider`] | HTTPS JSON, bearer key | 2xx with `{id}` |
//! | [`EmailJsProvider`] | HTTPS JSON, template params | 200 text |
//! | [`SmtpProvider`] | SMTP via `lettre` | 250 after DATA |
//!
//! Providers never fall back on their own; ordering and fail-over belong to
//! the delivery orchestrator.

pub mod content;
pub mod emailjs;
pub mod error;
pub mod http_client;
pub mod resend;
pub mod smtp;
pub mod traits;

pub use content::{EmailContent, SenderIdentity};
pub use emailjs::{EmailJsConfig, EmailJsProvider};
pub use error::{ProviderError, ProviderResult};
pub use resend::{ResendConfig, ResendProvider};
pub use smtp::{SmtpConfig, SmtpProvider, SmtpSecurity};
pub use traits::{DeliveryProvider, ProviderReceipt};
