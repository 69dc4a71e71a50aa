//! # Priced Proposal
//!
//! The immutable result of pricing a [`SelectionRequest`].
//!
//! Produced only by [`PricingEngine`]; every figure a document or email shows
//! is read from here, so the two can never disagree.
//!
//! # Invariants
//!
//! - `discounted_monthly == round_half_up(raw_monthly * (1 - discount_rate), 2)`
//! - `first_payment == discounted_monthly * billing_multiplier`
//!
//! [`SelectionRequest`]: crate::domain::entities::selection::SelectionRequest
//! [`PricingEngine`]: crate::domain::services::pricing::PricingEngine

use crate::domain::entities::package::AddOnKind;
use crate::domain::value_objects::{EmailAddress, Money, PaymentTerm, ProposalId, Timestamp};
use serde::Serialize;
use std::fmt;

/// An add-on as it appears on a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    /// Display name.
    pub name: String,
    /// Price (per month for recurring items).
    pub price: Money,
    /// Billing type.
    pub kind: AddOnKind,
}

/// A finalized, priced proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedProposal {
    pub(crate) id: ProposalId,
    pub(crate) recipient: EmailAddress,
    pub(crate) client_name: String,
    pub(crate) company: String,
    pub(crate) package_name: String,
    pub(crate) deliverables: Vec<String>,
    pub(crate) add_ons: Vec<LineItem>,
    pub(crate) payment_term: PaymentTerm,
    pub(crate) raw_monthly: Money,
    pub(crate) discounted_monthly: Money,
    pub(crate) first_payment: Money,
    pub(crate) one_time_total: Money,
    pub(crate) estimated_prospects: u32,
    pub(crate) generated_at: Timestamp,
}

impl PricedProposal {
    /// Returns the proposal identifier.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ProposalId {
        self.id
    }

    /// Returns the recipient address.
    #[inline]
    #[must_use]
    pub fn recipient(&self) -> &EmailAddress {
        &self.recipient
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

    /// Returns the package name.
    #[inline]
    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Returns the package deliverables.
    #[inline]
    #[must_use]
    pub fn deliverables(&self) -> &[String] {
        &self.deliverables
    }

    /// Returns the add-ons with their prices.
    #[inline]
    #[must_use]
    pub fn add_ons(&self) -> &[LineItem] {
        &self.add_ons
    }

    /// Returns the payment term.
    #[inline]
    #[must_use]
    pub fn payment_term(&self) -> PaymentTerm {
        self.payment_term
    }

    /// Package price plus recurring add-ons, before discount.
    #[inline]
    #[must_use]
    pub fn raw_monthly(&self) -> Money {
        self.raw_monthly
    }

    /// Discount as a whole percentage.
    #[inline]
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        self.payment_term.discount_percent()
    }

    /// Monthly amount after the term discount, rounded to cents.
    #[inline]
    #[must_use]
    pub fn discounted_monthly(&self) -> Money {
        self.discounted_monthly
    }

    /// Amount due at acceptance: discounted monthly times the billing multiplier.
    #[inline]
    #[must_use]
    pub fn first_payment(&self) -> Money {
        self.first_payment
    }

    /// Sum of one-time add-ons, billed separately from the monthly figures.
    #[inline]
    #[must_use]
    pub fn one_time_total(&self) -> Money {
        self.one_time_total
    }

    /// Estimated qualified prospects per month.
    #[inline]
    #[must_use]
    pub fn estimated_prospects(&self) -> u32 {
        self.estimated_prospects
    }

    /// Instant the proposal was priced; also its displayed date.
    #[inline]
    #[must_use]
    pub fn generated_at(&self) -> Timestamp {
        self.generated_at
    }

    /// Monthly saving from the term discount.
    #[must_use]
    pub fn monthly_saving(&self) -> Money {
        Money::new(self.raw_monthly.amount() - self.discounted_monthly.amount())
    }
}

impl fmt::Display for PricedProposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Proposal({} for {}: {} {}, first payment {})",
            self.id.reference(),
            self.company,
            self.package_name,
            self.payment_term,
            self.first_payment
        )
    }
}
