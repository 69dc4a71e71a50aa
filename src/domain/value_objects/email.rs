//! # Email Address
//!
//! Validated recipient address.

use crate::domain::errors::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A syntactically plausible email address.
///
/// Validation is deliberately shallow: a single `@` with a non-empty local
/// part and domain, and no whitespace. Deliverability is the provider's call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses and validates an address. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEmail`] if the address is malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use proposal_dispatch::domain::value_objects::email::EmailAddress;
    ///
    /// assert!(EmailAddress::parse("client@example.com").is_ok());
    /// assert!(EmailAddress::parse("not-an-email").is_err());
    /// ```
    pub fn parse(raw: &str) -> ValidationResult<Self> {
        let candidate = raw.trim();
        let invalid = || ValidationError::InvalidEmail(candidate.to_string());

        if candidate.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        let (local, domain) = candidate.split_once('@').ok_or_else(invalid)?;
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(invalid());
        }
        if domain.starts_with('.') || domain.ends_with('.') {
            return Err(invalid());
        }
        Ok(Self(candidate.to_string()))
    }

    /// Returns the address.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_address() {
        let email = EmailAddress::parse("  jane.doe@acme.io ").unwrap();
        assert_eq!(email.as_str(), "jane.doe@acme.io");
    }

    #[test]
    fn rejects_malformed() {
        for raw in [
            "not-an-email",
            "",
            "@acme.io",
            "jane@",
            "jane@@acme.io",
            "jane doe@acme.io",
            "jane@.acme.io",
        ] {
            assert!(
                matches!(EmailAddress::parse(raw), Err(ValidationError::InvalidEmail(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn serde_validates() {
        let ok: Result<EmailAddress, _> = serde_json::from_str("\"a@b.co\"");
        assert!(ok.is_ok());
        let bad: Result<EmailAddress, _> = serde_json::from_str("\"nope\"");
        assert!(bad.is_err());
    }
}
