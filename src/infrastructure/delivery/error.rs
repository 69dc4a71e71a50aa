//! # Provider Errors
//!
//! Failures of a single delivery attempt.
//!
//! A [`ProviderError`] never reaches the caller directly: the orchestrator
//! records it in the attempt history and moves to the next provider.
//!
//! # Examples
//!
//! ```
//! use proposal_dispatch::infrastructure::delivery::error::ProviderError;
//!
//! let error = ProviderError::timeout(10_000);
//! assert!(error.is_retryable());
//!
//! let error = ProviderError::rejected(422, "invalid from address");
//! assert_eq!(error.status(), Some(422));
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Error type for one provider send.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The attempt exceeded its deadline.
    #[error("provider timeout after {timeout_ms}ms")]
    Timeout {
        /// Deadline in milliseconds.
        timeout_ms: u64,
    },

    /// Network or connection failure.
    #[error("provider connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Credentials refused.
    #[error("provider authentication error ({status}): {message}")]
    Authentication {
        /// HTTP or SMTP status.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Provider is throttling requests.
    #[error("provider rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
    },

    /// Provider answered with a non-success status.
    #[error("provider rejected request ({status}): {message}")]
    Rejected {
        /// HTTP or SMTP status.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// Response could not be understood.
    #[error("provider protocol error: {message}")]
    ProtocolError {
        /// Error message.
        message: String,
    },

    /// The message could not be built from the proposal.
    #[error("provider invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// Adapter failure unrelated to the remote side.
    #[error("provider internal error: {message}")]
    InternalError {
        /// Error message.
        message: String,
    },
}

impl ProviderError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(timeout_ms: u64) -> Self {
        Self::Timeout { timeout_ms }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(status: u16, message: impl Into<String>) -> Self {
        Self::Authentication {
            status,
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Creates a rejected-status error.
    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol_error(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Returns the status code reported by the provider, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Rejected { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Returns true if the failure is transient.
    ///
    /// Informational only; the orchestrator never retries a provider.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } | Self::RateLimited { .. } => true,
            Self::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
