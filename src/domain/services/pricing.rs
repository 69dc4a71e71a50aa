//! # Pricing Engine
//!
//! Turns a [`SelectionRequest`] into a [`PricedProposal`]. Pure: no I/O,
//! no failure path.
//!
//! ```text
//! raw_monthly        = package price + Σ recurring add-on prices
//! discounted_monthly = round_half_up(raw_monthly × (1 − discount_rate), cents)
//! first_payment      = discounted_monthly × billing_multiplier
//! one_time_total     = Σ one-time add-on prices
//! ```
//!
//! # Examples
//!
//! ```
//! use proposal_dispatch::domain::entities::{AddOn, AddOnKind, Package, SelectionRequest};
//! use proposal_dispatch::domain::services::pricing::PricingEngine;
//! use proposal_dispatch::domain::value_objects::{EmailAddress, Money, PackageId, PaymentTerm};
//!
//! let selection = SelectionRequest::new(
//!     EmailAddress::parse("client@example.com").unwrap(),
//!     Package::new(PackageId::new("growth"), "Growth", Money::from_whole(4200)).unwrap(),
//!     vec![AddOn::new("Extra Inbox", Money::from_whole(300), AddOnKind::Recurring).unwrap()],
//!     PaymentTerm::Quarterly,
//!     None,
//!     None,
//! );
//!
//! let proposal = PricingEngine::new().price(&selection);
//! assert_eq!(proposal.raw_monthly(), Money::from_whole(4500));
//! assert_eq!(proposal.discounted_monthly(), Money::from_whole(4275));
//! assert_eq!(proposal.first_payment(), Money::from_whole(12825));
//! ```

use crate::domain::entities::package::AddOn;
use crate::domain::entities::proposal::{LineItem, PricedProposal};
use crate::domain::entities::selection::SelectionRequest;
use crate::domain::services::prospects::estimate_prospects;
use crate::domain::value_objects::{Money, ProposalId, Timestamp};

/// Stateless pricing calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingEngine;

impl PricingEngine {
    /// Creates a pricing engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Prices a selection, stamping the current instant.
    #[must_use]
    pub fn price(&self, selection: &SelectionRequest) -> PricedProposal {
        self.price_at(selection, Timestamp::now())
    }

    /// Prices a selection at a fixed instant.
    #[must_use]
    pub fn price_at(&self, selection: &SelectionRequest, generated_at: Timestamp) -> PricedProposal {
        let term = selection.payment_term();
        let package = selection.package();

        let recurring: Money = selection
            .add_ons()
            .iter()
            .filter(|a| a.is_recurring())
            .map(AddOn::price)
            .sum();
        let one_time_total: Money = selection
            .add_ons()
            .iter()
            .filter(|a| !a.is_recurring())
            .map(AddOn::price)
            .sum();

        let raw_monthly = package.monthly_price() + recurring;
        let discounted_monthly = raw_monthly.apply_discount(term.discount_rate());
        let first_payment = discounted_monthly.times(term.billing_multiplier());

        let add_ons = selection
            .add_ons()
            .iter()
            .map(|a| LineItem {
                name: a.name().to_string(),
                price: a.price(),
                kind: a.kind(),
            })
            .collect();

        PricedProposal {
            id: ProposalId::new_v4(),
            recipient: selection.recipient().clone(),
            client_name: selection.client_name().to_string(),
            company: selection.company().to_string(),
            package_name: package.name().to_string(),
            deliverables: package.deliverables().to_vec(),
            add_ons,
            payment_term: term,
            raw_monthly,
            discounted_monthly,
            first_payment,
            one_time_total,
            estimated_prospects: estimate_prospects(package),
            generated_at,
        }
    }
}
