//! # Selection Request
//!
//! A validated client selection: who receives the proposal and what they
//! picked. Constructed once per inbound call and never mutated afterwards.

use crate::domain::entities::package::{AddOn, Package};
use crate::domain::value_objects::{EmailAddress, PaymentTerm};
use serde::Serialize;

/// Client name used when the request does not carry one.
pub const DEFAULT_CLIENT_NAME: &str = "Valued Client";

/// Company name used when the request does not carry one.
pub const DEFAULT_COMPANY: &str = "Your Company";

/// A validated selection ready for pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionRequest {
    recipient: EmailAddress,
    package: Package,
    add_ons: Vec<AddOn>,
    payment_term: PaymentTerm,
    client_name: String,
    company: String,
}

impl SelectionRequest {
    /// Creates a selection. Blank or missing names fall back to
    /// [`DEFAULT_CLIENT_NAME`] and [`DEFAULT_COMPANY`].
    #[must_use]
    pub fn new(
        recipient: EmailAddress,
        package: Package,
        add_ons: Vec<AddOn>,
        payment_term: PaymentTerm,
        client_name: Option<&str>,
        company: Option<&str>,
    ) -> Self {
        Self {
            recipient,
            package,
            add_ons,
            payment_term,
            client_name: non_blank_or(client_name, DEFAULT_CLIENT_NAME),
            company: non_blank_or(company, DEFAULT_COMPANY),
        }
    }

    /// Returns the recipient.
    #[inline]
    #[must_use]
    pub fn recipient(&self) -> &EmailAddress {
        &self.recipient
    }

    /// Returns the chosen package.
    #[inline]
    #[must_use]
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Returns the chosen add-ons.
    #[inline]
    #[must_use]
    pub fn add_ons(&self) -> &[AddOn] {
        &self.add_ons
    }

    /// Returns the payment term.
    #[inline]
    #[must_use]
    pub fn payment_term(&self) -> PaymentTerm {
        self.payment_term
    }

    /// Returns the client display name.
    #[inline]
    #[must_use]
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// Returns the company name.
    #[inline]
    #[must_use]
    pub fn company(&self) -> &str {
        &self.company
    }
}

fn non_blank_or(value: Option<&str>, fallback: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Money, PackageId};

    fn package() -> Package {
        Package::new(PackageId::new("growth"), "Growth", Money::from_whole(4200)).unwrap()
    }

    #[test]
    fn defaults_for_missing_names() {
        let selection = SelectionRequest::new(
            EmailAddress::parse("a@b.co").unwrap(),
            package(),
            vec![],
            PaymentTerm::Monthly,
            None,
            Some("   "),
        );
        assert_eq!(selection.client_name(), DEFAULT_CLIENT_NAME);
        assert_eq!(selection.company(), DEFAULT_COMPANY);
    }

    #[test]
    fn keeps_trimmed_names() {
        let selection = SelectionRequest::new(
            EmailAddress::parse("a@b.co").unwrap(),
            package(),
            vec![],
            PaymentTerm::Annual,
            Some(" Jane Doe "),
            Some("Acme"),
        );
        assert_eq!(selection.client_name(), "Jane Doe");
        assert_eq!(selection.company(), "Acme");
        assert_eq!(selection.payment_term(), PaymentTerm::Annual);
    }
}
