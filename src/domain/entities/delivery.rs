//! # Delivery Records
//!
//! Per-provider attempts and the terminal outcome of one delivery cycle.

use crate::domain::value_objects::{ProviderId, Timestamp};
use serde::Serialize;
use std::fmt;

/// Outcome of a single provider attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The provider accepted the message.
    Succeeded {
        /// Provider-assigned message identifier.
        message_id: String,
    },
    /// The provider failed or rejected the message.
    Failed {
        /// Error detail as reported by the provider adapter.
        error: String,
        /// HTTP (or SMTP) status, when one was received.
        status: Option<u16>,
    },
}

/// One try against one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryAttempt {
    provider: ProviderId,
    outcome: AttemptOutcome,
    attempted_at: Timestamp,
}

impl DeliveryAttempt {
    /// Records a successful attempt.
    #[must_use]
    pub fn succeeded(provider: ProviderId, message_id: impl Into<String>) -> Self {
        Self {
            provider,
            outcome: AttemptOutcome::Succeeded {
                message_id: message_id.into(),
            },
            attempted_at: Timestamp::now(),
        }
    }

    /// Records a failed attempt.
    #[must_use]
    pub fn failed(provider: ProviderId, error: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            provider,
            outcome: AttemptOutcome::Failed {
                error: error.into(),
                status,
            },
            attempted_at: Timestamp::now(),
        }
    }

    /// Returns the provider tried.
    #[inline]
    #[must_use]
    pub fn provider(&self) -> &ProviderId {
        &self.provider
    }

    /// Returns the outcome.
    #[inline]
    #[must_use]
    pub fn outcome(&self) -> &AttemptOutcome {
        &self.outcome
    }

    /// Returns when the attempt was made.
    #[inline]
    #[must_use]
    pub fn attempted_at(&self) -> Timestamp {
        self.attempted_at
    }

    /// Returns true if this attempt succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Succeeded { .. })
    }

    /// Returns the error detail for a failed attempt.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            AttemptOutcome::Failed { error, .. } => Some(error),
            AttemptOutcome::Succeeded { .. } => None,
        }
    }
}

impl fmt::Display for DeliveryAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            AttemptOutcome::Succeeded { message_id } => {
                write!(f, "{}: delivered ({})", self.provider, message_id)
            }
            AttemptOutcome::Failed { error, status } => {
                write!(f, "{}: {}", self.provider, error)?;
                if let Some(status) = status {
                    write!(f, " [status {}]", status)?;
                }
                Ok(())
            }
        }
    }
}

/// Terminal outcome of a delivery cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DeliveryResult {
    /// One provider accepted the message; later providers were not tried.
    Succeeded {
        /// The provider that delivered.
        provider: ProviderId,
        /// Its message identifier.
        message_id: String,
        /// Every attempt made, in order, ending with the successful one.
        attempts: Vec<DeliveryAttempt>,
    },
    /// Every provider failed.
    ExhaustedFailed {
        /// One failed attempt per configured provider, in order.
        attempts: Vec<DeliveryAttempt>,
    },
}

impl DeliveryResult {
    /// Returns true if delivery succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Returns the delivering provider.
    #[must_use]
    pub fn provider(&self) -> Option<&ProviderId> {
        match self {
            Self::Succeeded { provider, .. } => Some(provider),
            Self::ExhaustedFailed { .. } => None,
        }
    }

    /// Returns the delivering provider's message id.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        match self {
            Self::Succeeded { message_id, .. } => Some(message_id),
            Self::ExhaustedFailed { .. } => None,
        }
    }

    /// Returns all attempts in order.
    #[must_use]
    pub fn attempts(&self) -> &[DeliveryAttempt] {
        match self {
            Self::Succeeded { attempts, .. } | Self::ExhaustedFailed { attempts } => attempts,
        }
    }

    /// Returns `(provider, error)` for every failed attempt, in order.
    #[must_use]
    pub fn errors(&self) -> Vec<(&ProviderId, &str)> {
        self.attempts()
            .iter()
            .filter_map(|a| a.error().map(|e| (a.provider(), e)))
            .collect()
    }
}

impl fmt::Display for DeliveryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded {
                provider,
                message_id,
                ..
            } => write!(f, "delivered via {} ({})", provider, message_id),
            Self::ExhaustedFailed { attempts } => {
                write!(f, "all {} providers failed", attempts.len())
            }
        }
    }
}
