//! # Delivery Provider Trait
//!
//! Port definition for email delivery services.
//!
//! Every provider sends one proposal email with the rendered document
//! attached. Providers are tried in a fixed order by the
//! [`DeliveryOrchestrator`](crate::application::services::delivery_orchestrator::DeliveryOrchestrator);
//! a provider only reports the outcome of its own attempt and never falls
//! back by itself.
//!
//! # Examples
//!
//! ```ignore
//! use proposal_dispatch::infrastructure::delivery::traits::{DeliveryProvider, ProviderReceipt};
//!
//! struct MyProvider { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl DeliveryProvider for MyProvider {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::entities::proposal::PricedProposal;
use crate::domain::value_objects::{EmailAddress, ProviderId};
use crate::infrastructure::delivery::error::ProviderResult;
use crate::infrastructure::rendering::traits::RenderedDocument;
use async_trait::async_trait;
use std::fmt;

/// Default per-attempt deadline.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Acknowledgement of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderReceipt {
    message_id: String,
}

impl ProviderReceipt {
    /// Creates a receipt for the provider's message id.
    #[must_use]
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
        }
    }

    /// Returns the provider's message id.
    #[inline]
    #[must_use]
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Consumes the receipt, returning the message id.
    #[must_use]
    pub fn into_message_id(self) -> String {
        self.message_id
    }
}

impl fmt::Display for ProviderReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Receipt({})", self.message_id)
    }
}

/// An email delivery service.
#[async_trait]
pub trait DeliveryProvider: Send + Sync + fmt::Debug {
    /// Returns the identifier used in logs and results.
    fn provider_id(&self) -> &ProviderId;

    /// Returns the per-attempt deadline in milliseconds.
    fn timeout_ms(&self) -> u64 {
        DEFAULT_TIMEOUT_MS
    }

    /// Sends the proposal email with the document attached.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`](crate::infrastructure::delivery::error::ProviderError)
    /// for any non-success outcome.
    async fn send(
        &self,
        proposal: &PricedProposal,
        recipient: &EmailAddress,
        document: &RenderedDocument,
    ) -> ProviderResult<ProviderReceipt>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_accessors() {
        let receipt = ProviderReceipt::new("msg-1");
        assert_eq!(receipt.message_id(), "msg-1");
        assert_eq!(receipt.to_string(), "Receipt(msg-1)");
        assert_eq!(receipt.into_message_id(), "msg-1");
    }
}
