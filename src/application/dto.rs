//! # Proposal Request DTO
//!
//! The inbound proposal request as clients send it, and its conversion into
//! a validated [`SelectionRequest`].
//!
//! Field names follow the client's JSON (`recipientEmail`,
//! `selectedPackage`, ...). Missing fields deserialize to empty values so
//! that validation, not deserialization, reports what is wrong.

use crate::domain::entities::catalog::PackageCatalog;
use crate::domain::entities::package::{AddOn, AddOnKind, Package};
use crate::domain::entities::selection::SelectionRequest;
use crate::domain::errors::{ValidationError, ValidationResult};
use crate::domain::value_objects::{EmailAddress, Money, PackageId, PaymentTerm};
use serde::{Deserialize, Serialize};

/// A package chosen either by catalog id or given in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PackageSelection {
    /// Catalog identifier (or display name).
    Id(String),
    /// Package described inline by the client.
    Inline(InlinePackage),
}

/// Package details supplied inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlinePackage {
    /// Catalog id; when it resolves, the catalog entry is used instead.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Base monthly price.
    pub price: Money,
    /// Deliverables in display order.
    #[serde(default)]
    pub deliverables: Vec<String>,
    /// Monthly prospect estimate.
    #[serde(default)]
    pub estimated_prospects: Option<u32>,
}

/// An add-on as sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnSelection {
    /// Display name.
    pub name: String,
    /// Price.
    pub price: Money,
    /// Billing type tag; anything but a one-time tag means recurring.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Inbound proposal request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRequest {
    /// Where the proposal goes.
    #[serde(default)]
    pub recipient_email: String,
    /// Chosen package.
    #[serde(default)]
    pub selected_package: Option<PackageSelection>,
    /// Chosen add-ons.
    #[serde(default)]
    pub selected_addons: Vec<AddOnSelection>,
    /// Payment term; unknown values mean monthly.
    #[serde(default)]
    pub selected_payment: Option<String>,
    /// Client display name.
    #[serde(default)]
    pub client_name: Option<String>,
    /// Client company.
    #[serde(default)]
    pub company: Option<String>,
}

impl ProposalRequest {
    /// Validates the request against the catalog.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found: recipient first, then
    /// package, then add-ons.
    pub fn into_selection(self, catalog: &PackageCatalog) -> ValidationResult<SelectionRequest> {
        let recipient = EmailAddress::parse(&self.recipient_email)?;
        let package = resolve_package(self.selected_package, catalog)?;
        let add_ons = self
            .selected_addons
            .into_iter()
            .map(|a| AddOn::new(a.name, a.price, AddOnKind::from_tag(a.kind.as_deref())))
            .collect::<ValidationResult<Vec<_>>>()?;
        let term = PaymentTerm::parse_lenient(self.selected_payment.as_deref().unwrap_or_default());

        Ok(SelectionRequest::new(
            recipient,
            package,
            add_ons,
            term,
            self.client_name.as_deref(),
            self.company.as_deref(),
        ))
    }
}

fn resolve_package(
    selection: Option<PackageSelection>,
    catalog: &PackageCatalog,
) -> ValidationResult<Package> {
    match selection {
        None => Err(ValidationError::MissingPackage),
        Some(PackageSelection::Id(key)) => {
            let key = key.trim();
            if key.is_empty() {
                return Err(ValidationError::MissingPackage);
            }
            catalog
                .find(key)
                .cloned()
                .ok_or_else(|| ValidationError::UnknownPackage(key.to_string()))
        }
        Some(PackageSelection::Inline(inline)) => {
            if let Some(known) = inline.id.as_deref().and_then(|id| catalog.get(id)) {
                return Ok(known.clone());
            }
            let id = inline
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| slug(&inline.name));
            let package = Package::new(PackageId::new(id), inline.name, inline.price)?
                .with_deliverables(inline.deliverables);
            Ok(match inline.estimated_prospects {
                Some(prospects) => package.with_estimated_prospects(prospects),
                None => package,
            })
        }
    }
}

fn slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> PackageCatalog {
        PackageCatalog::standard().unwrap()
    }

    fn parse(value: serde_json::Value) -> ProposalRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn catalog_id_selection() {
        let request = parse(json!({
            "recipientEmail": "client@example.com",
            "selectedPackage": "growth",
            "selectedAddons": [{"name": "Extra Inbox", "price": 300}],
            "selectedPayment": "QUARTERLY",
            "clientName": "Jane",
            "company": "Acme"
        }));
        let selection = request.into_selection(&catalog()).unwrap();
        assert_eq!(selection.package().name(), "Growth");
        assert_eq!(selection.payment_term(), PaymentTerm::Quarterly);
        assert_eq!(selection.add_ons().len(), 1);
        assert!(selection.add_ons()[0].is_recurring());
        assert_eq!(selection.client_name(), "Jane");
    }

    #[test]
    fn inline_package_selection() {
        let request = parse(json!({
            "recipientEmail": "client@example.com",
            "selectedPackage": {
                "name": "Custom Plan",
                "price": "3100.50",
                "deliverables": ["750 outreach emails", "Reporting"]
            },
            "selectedAddons": [{"name": "Setup", "price": 500, "type": "one-time"}]
        }));
        let selection = request.into_selection(&catalog()).unwrap();
        assert_eq!(selection.package().id().as_str(), "custom-plan");
        assert_eq!(selection.package().monthly_price(), Money::from_minor(310_050));
        assert!(!selection.add_ons()[0].is_recurring());
        assert_eq!(selection.payment_term(), PaymentTerm::Monthly);
        assert_eq!(selection.client_name(), "Valued Client");
        assert_eq!(selection.company(), "Your Company");
    }

    #[test]
    fn inline_package_with_known_id_uses_catalog() {
        let request = parse(json!({
            "recipientEmail": "client@example.com",
            "selectedPackage": {"id": "starter", "name": "Starter", "price": 1}
        }));
        let selection = request.into_selection(&catalog()).unwrap();
        assert_eq!(selection.package().monthly_price(), Money::from_whole(2500));
    }

    #[test]
    fn invalid_email_is_rejected_first() {
        let request = parse(json!({"recipientEmail": "not-an-email"}));
        assert_eq!(
            request.into_selection(&catalog()).unwrap_err(),
            ValidationError::InvalidEmail("not-an-email".into())
        );
    }

    #[test]
    fn missing_and_unknown_packages() {
        let request = parse(json!({"recipientEmail": "a@b.co"}));
        assert_eq!(
            request.into_selection(&catalog()).unwrap_err(),
            ValidationError::MissingPackage
        );

        let request = parse(json!({"recipientEmail": "a@b.co", "selectedPackage": "platinum"}));
        assert_eq!(
            request.into_selection(&catalog()).unwrap_err(),
            ValidationError::UnknownPackage("platinum".into())
        );
    }

    #[test]
    fn negative_add_on_price_is_rejected() {
        let request = parse(json!({
            "recipientEmail": "a@b.co",
            "selectedPackage": "growth",
            "selectedAddons": [{"name": "Refund", "price": -10}]
        }));
        assert!(matches!(
            request.into_selection(&catalog()).unwrap_err(),
            ValidationError::InvalidPrice { .. }
        ));
    }

    #[test]
    fn blank_add_on_name_is_rejected() {
        let request = parse(json!({
            "recipientEmail": "a@b.co",
            "selectedPackage": "growth",
            "selectedAddons": [{"name": "  ", "price": 10}]
        }));
        assert_eq!(
            request.into_selection(&catalog()).unwrap_err(),
            ValidationError::BlankField("add-on name")
        );
    }
}
