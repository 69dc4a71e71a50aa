//! # Domain Errors
//!
//! Validation failures raised while turning raw input into a
//! [`SelectionRequest`](crate::domain::entities::selection::SelectionRequest).
//!
//! Every variant is detected before any pricing, rendering or network work
//! takes place.

use thiserror::Error;

/// Input validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Recipient address is missing or malformed.
    #[error("invalid recipient email: '{0}'")]
    InvalidEmail(String),

    /// No package was selected.
    #[error("a package selection is required")]
    MissingPackage,

    /// The selected package identifier is not in the catalog.
    #[error("unknown package: '{0}'")]
    UnknownPackage(String),

    /// A price is negative or exceeds the accepted ceiling.
    #[error("invalid price for '{item}': {reason}")]
    InvalidPrice {
        /// Name of the priced item.
        item: String,
        /// Why the price was rejected.
        reason: String,
    },

    /// A required text field is blank.
    #[error("{0} must not be blank")]
    BlankField(&'static str),
}

impl ValidationError {
    /// Creates an invalid price error.
    #[must_use]
    pub fn invalid_price(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPrice {
            item: item.into(),
            reason: reason.into(),
        }
    }

    /// Request field the error refers to, as named in the inbound JSON.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidEmail(_) => "recipientEmail",
            Self::MissingPackage | Self::UnknownPackage(_) => "selectedPackage",
            Self::InvalidPrice { .. } => "price",
            Self::BlankField(field) => field,
        }
    }
}

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            ValidationError::InvalidEmail("x".into()).to_string(),
            "invalid recipient email: 'x'"
        );
        assert_eq!(
            ValidationError::MissingPackage.to_string(),
            "a package selection is required"
        );
        let err = ValidationError::invalid_price("SEO", "must not be negative");
        assert!(err.to_string().contains("SEO"));
        assert_eq!(
            ValidationError::BlankField("add-on name").to_string(),
            "add-on name must not be blank"
        );
    }
}
