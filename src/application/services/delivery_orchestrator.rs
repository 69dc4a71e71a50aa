//! # Delivery Orchestrator
//!
//! Ordered fail-over across delivery providers.
//!
//! Providers are tried one at a time in configuration order. The first
//! success ends the cycle; a failure (error status, transport error or
//! timeout) moves on to the next provider. Each provider is tried at most
//! once per cycle and nothing is retried.
//!
//! ```text
//! Pending ─▶ Attempting(0) ─┬─▶ Succeeded(0)
//!                           └─▶ Attempting(1) ─┬─▶ Succeeded(1)
//!                                              └─▶ ... ─▶ ExhaustedFailed
//! ```

use crate::application::error::ConfigError;
use crate::domain::entities::delivery::{DeliveryAttempt, DeliveryResult};
use crate::domain::entities::proposal::PricedProposal;
use crate::domain::value_objects::EmailAddress;
use crate::infrastructure::delivery::error::ProviderError;
use crate::infrastructure::delivery::traits::DeliveryProvider;
use crate::infrastructure::rendering::traits::RenderedDocument;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Position of a delivery cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryState {
    /// Nothing tried yet.
    #[default]
    Pending,
    /// Waiting on the provider at this index.
    Attempting(usize),
    /// The provider at this index accepted the message.
    Succeeded(usize),
    /// Every provider failed.
    ExhaustedFailed,
}

impl DeliveryState {
    /// Transition out of `Pending` to the first provider.
    ///
    /// Any other state is returned unchanged.
    #[must_use]
    pub fn begin(self, provider_count: usize) -> Self {
        match self {
            Self::Pending if provider_count == 0 => Self::ExhaustedFailed,
            Self::Pending => Self::Attempting(0),
            other => other,
        }
    }

    /// Transition after the current attempt succeeded.
    #[must_use]
    pub fn on_success(self) -> Self {
        match self {
            Self::Attempting(index) => Self::Succeeded(index),
            other => other,
        }
    }

    /// Transition after the current attempt failed.
    #[must_use]
    pub fn on_failure(self, provider_count: usize) -> Self {
        match self {
            Self::Attempting(index) if index + 1 < provider_count => Self::Attempting(index + 1),
            Self::Attempting(_) => Self::ExhaustedFailed,
            other => other,
        }
    }

    /// Returns true once no further attempt will be made.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::ExhaustedFailed)
    }
}

impl fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Attempting(i) => write!(f, "ATTEMPTING({})", i),
            Self::Succeeded(i) => write!(f, "SUCCEEDED({})", i),
            Self::ExhaustedFailed => write!(f, "EXHAUSTED_FAILED"),
        }
    }
}

/// Tries providers in order until one accepts the proposal.
#[derive(Clone)]
pub struct DeliveryOrchestrator {
    providers: Vec<Arc<dyn DeliveryProvider>>,
}

impl fmt::Debug for DeliveryOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self
            .providers
            .iter()
            .map(|p| p.provider_id().to_string())
            .collect();
        f.debug_struct("DeliveryOrchestrator")
            .field("providers", &ids)
            .finish()
    }
}

impl DeliveryOrchestrator {
    /// Creates an orchestrator over an ordered provider list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyProviderList`] if `providers` is empty and
    /// [`ConfigError::DuplicateProvider`] if two providers share an id.
    pub fn new(providers: Vec<Arc<dyn DeliveryProvider>>) -> Result<Self, ConfigError> {
        if providers.is_empty() {
            return Err(ConfigError::EmptyProviderList);
        }
        let mut seen = HashSet::new();
        for provider in &providers {
            if !seen.insert(provider.provider_id().clone()) {
                return Err(ConfigError::DuplicateProvider(
                    provider.provider_id().to_string(),
                ));
            }
        }
        Ok(Self { providers })
    }

    /// Returns the providers in attempt order.
    #[must_use]
    pub fn providers(&self) -> &[Arc<dyn DeliveryProvider>] {
        &self.providers
    }

    /// Delivers the proposal, failing over until a provider succeeds.
    ///
    /// Never returns an error: a cycle where every provider fails yields
    /// [`DeliveryResult::ExhaustedFailed`] with one attempt per provider.
    pub async fn deliver(
        &self,
        proposal: &PricedProposal,
        recipient: &EmailAddress,
        document: &RenderedDocument,
    ) -> DeliveryResult {
        let count = self.providers.len();
        let mut attempts = Vec::with_capacity(count);
        let mut state = DeliveryState::Pending;
        debug!(proposal = %proposal.id(), providers = count, state = %state, "Starting delivery cycle");
        state = state.begin(count);

        while let DeliveryState::Attempting(index) = state {
            let Some(provider) = self.providers.get(index) else {
                break;
            };
            let provider_id = provider.provider_id().clone();
            let timeout_ms = provider.timeout_ms();

            info!(
                proposal = %proposal.id(),
                provider = %provider_id,
                attempt = index + 1,
                of = count,
                "Attempting delivery"
            );

            let outcome = match timeout(
                Duration::from_millis(timeout_ms),
                provider.send(proposal, recipient, document),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(ProviderError::timeout(timeout_ms)),
            };

            match outcome {
                Ok(receipt) => {
                    info!(
                        proposal = %proposal.id(),
                        provider = %provider_id,
                        message_id = receipt.message_id(),
                        state = %state.on_success(),
                        "Proposal delivered"
                    );
                    attempts.push(DeliveryAttempt::succeeded(
                        provider_id.clone(),
                        receipt.message_id(),
                    ));
                    return DeliveryResult::Succeeded {
                        provider: provider_id,
                        message_id: receipt.into_message_id(),
                        attempts,
                    };
                }
                Err(e) => {
                    state = state.on_failure(count);
                    if state.is_terminal() {
                        error!(
                            proposal = %proposal.id(),
                            provider = %provider_id,
                            error = %e,
                            "Delivery failed on last provider"
                        );
                    } else {
                        warn!(
                            proposal = %proposal.id(),
                            provider = %provider_id,
                            error = %e,
                            "Delivery failed, falling back to next provider"
                        );
                    }
                    attempts.push(DeliveryAttempt::failed(provider_id, e.to_string(), e.status()));
                }
            }
        }

        error!(
            proposal = %proposal.id(),
            attempts = attempts.len(),
            "All delivery providers failed"
        );
        DeliveryResult::ExhaustedFailed { attempts }
    }
}
