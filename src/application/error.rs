//! # Application Errors
//!
//! Error types for the application layer.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Validation(ValidationError) - bad client input, nothing was sent
//! ├── Configuration(ConfigError)  - misconfigured provider chain
//! └── Render(RenderError)         - document construction failed
//! ```
//!
//! Provider failures are not here: they are absorbed by the orchestrator and
//! reported in the [`DeliveryResult`](crate::domain::entities::DeliveryResult).
//!
//! # Examples
//!
//! ```
//! use proposal_dispatch::application::error::{ApplicationError, ConfigError};
//! use proposal_dispatch::domain::errors::ValidationError;
//!
//! let err: ApplicationError = ValidationError::MissingPackage.into();
//! assert!(err.is_validation());
//!
//! let err: ApplicationError = ConfigError::EmptyProviderList.into();
//! assert!(!err.is_validation());
//! ```

use crate::domain::errors::ValidationError;
use crate::infrastructure::rendering::error::RenderError;
use thiserror::Error;

/// Configuration problem detected at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No delivery providers were configured.
    #[error("configuration error: provider list is empty")]
    EmptyProviderList,

    /// The delivery order names a provider with no configuration section.
    #[error("configuration error: unknown provider '{0}'")]
    UnknownProvider(String),

    /// A provider appears twice in the delivery order.
    #[error("configuration error: provider '{0}' listed more than once")]
    DuplicateProvider(String),

    /// A required credential or setting is missing or blank.
    #[error("configuration error: {provider} is missing '{field}'")]
    MissingCredential {
        /// Provider or section name.
        provider: String,
        /// Missing field.
        field: &'static str,
    },

    /// A value is present but unusable.
    #[error("configuration error: invalid {field}: {message}")]
    Invalid {
        /// Offending field.
        field: String,
        /// Why it was rejected.
        message: String,
    },

    /// Configuration sources could not be read or deserialized.
    #[error("configuration error: {0}")]
    Load(String),
}

impl ConfigError {
    /// Creates a missing credential error.
    #[must_use]
    pub fn missing(provider: impl Into<String>, field: &'static str) -> Self {
        Self::MissingCredential {
            provider: provider.into(),
            field,
        }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(error: config::ConfigError) -> Self {
        Self::Load(error.to_string())
    }
}

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Client input was rejected.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The service is misconfigured.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// The document could not be produced.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

impl ApplicationError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns the field-level detail shown to API callers.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Configuration(e) => e.to_string(),
            Self::Render(e) => e.to_string(),
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_from_domain() {
        let err: ApplicationError = ValidationError::InvalidEmail("x".into()).into();
        assert!(err.is_validation());
        assert!(err.to_string().contains("validation"));
    }

    #[test]
    fn render_from_infrastructure() {
        let err: ApplicationError = RenderError::encoding("closed").into();
        assert!(!err.is_validation());
        assert!(err.detail().contains("closed"));
    }

    #[test]
    fn config_error_display() {
        assert_eq!(
            ConfigError::missing("resend", "api_key").to_string(),
            "configuration error: resend is missing 'api_key'"
        );
        assert_eq!(
            ConfigError::UnknownProvider("fax".into()).to_string(),
            "configuration error: unknown provider 'fax'"
        );
        let err: ApplicationError = ConfigError::EmptyProviderList.into();
        assert_eq!(err.to_string(), "configuration error: provider list is empty");
    }
}
