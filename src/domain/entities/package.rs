//! # Package and Add-on Entities
//!
//! Immutable reference data a client chooses from.
//!
//! # Examples
//!
//! ```
//! use proposal_dispatch::domain::entities::package::{AddOn, AddOnKind, Package};
//! use proposal_dispatch::domain::value_objects::{Money, PackageId};
//!
//! let package = Package::new(PackageId::new("growth"), "Growth", Money::from_whole(4200))
//!     .unwrap()
//!     .with_deliverables(["1,000 targeted outreach emails per month"]);
//! assert_eq!(package.deliverables().len(), 1);
//!
//! let add_on = AddOn::new("LinkedIn Automation", Money::from_whole(300), AddOnKind::Recurring).unwrap();
//! assert!(add_on.is_recurring());
//! ```

use crate::domain::errors::{ValidationError, ValidationResult};
use crate::domain::value_objects::{Money, PackageId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound accepted for any single monthly price.
pub const MAX_MONTHLY_PRICE: i64 = 10_000_000;

fn validate_price(item: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::invalid_price(item, "must not be negative"));
    }
    if price > Money::from_whole(MAX_MONTHLY_PRICE) {
        return Err(ValidationError::invalid_price(
            item,
            format!("exceeds the maximum of {}", Money::from_whole(MAX_MONTHLY_PRICE)),
        ));
    }
    Ok(())
}

/// A named bundle of deliverables at a fixed base monthly price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    id: PackageId,
    name: String,
    monthly_price: Money,
    deliverables: Vec<String>,
    estimated_prospects: Option<u32>,
}

impl Package {
    /// Creates a package without deliverables.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the name is blank or the price is
    /// negative or above [`MAX_MONTHLY_PRICE`].
    pub fn new(id: PackageId, name: impl Into<String>, monthly_price: Money) -> ValidationResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::BlankField("package name"));
        }
        validate_price(&name, monthly_price)?;
        Ok(Self {
            id,
            name,
            monthly_price,
            deliverables: Vec::new(),
            estimated_prospects: None,
        })
    }

    /// Sets the ordered deliverable descriptions. Blank entries are dropped.
    #[must_use]
    pub fn with_deliverables<I, S>(mut self, deliverables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deliverables = deliverables
            .into_iter()
            .map(Into::into)
            .filter(|d: &String| !d.trim().is_empty())
            .collect();
        self
    }

    /// Sets the looked-up monthly prospect estimate.
    #[must_use]
    pub fn with_estimated_prospects(mut self, prospects: u32) -> Self {
        self.estimated_prospects = Some(prospects);
        self
    }

    /// Returns the catalog identifier.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &PackageId {
        &self.id
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the base monthly price.
    #[inline]
    #[must_use]
    pub fn monthly_price(&self) -> Money {
        self.monthly_price
    }

    /// Returns the deliverables in display order.
    #[inline]
    #[must_use]
    pub fn deliverables(&self) -> &[String] {
        &self.deliverables
    }

    /// Returns the looked-up prospect estimate, if the catalog provides one.
    #[inline]
    #[must_use]
    pub fn estimated_prospects(&self) -> Option<u32> {
        self.estimated_prospects
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/month)", self.name, self.monthly_price)
    }
}

/// Billing type of an add-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddOnKind {
    /// Billed every month alongside the package.
    #[default]
    Recurring,
    /// Billed once; excluded from monthly figures.
    OneTime,
}

impl AddOnKind {
    /// Interprets a free-form type tag. Anything not recognised as one-time
    /// is treated as recurring.
    #[must_use]
    pub fn from_tag(tag: Option<&str>) -> Self {
        let Some(tag) = tag else {
            return Self::Recurring;
        };
        match tag.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "one-time" | "onetime" | "once" | "setup" => Self::OneTime,
            _ => Self::Recurring,
        }
    }
}

impl fmt::Display for AddOnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recurring => write!(f, "recurring"),
            Self::OneTime => write!(f, "one-time"),
        }
    }
}

/// An optional priced extra layered onto a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    name: String,
    price: Money,
    kind: AddOnKind,
}

impl AddOn {
    /// Creates an add-on.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the name is blank or the price invalid.
    pub fn new(name: impl Into<String>, price: Money, kind: AddOnKind) -> ValidationResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::BlankField("add-on name"));
        }
        validate_price(&name, price)?;
        Ok(Self { name, price, kind })
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the price (monthly for recurring add-ons).
    #[inline]
    #[must_use]
    pub fn price(&self) -> Money {
        self.price
    }

    /// Returns the billing type.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> AddOnKind {
        self.kind
    }

    /// Returns true if billed monthly.
    #[inline]
    #[must_use]
    pub fn is_recurring(&self) -> bool {
        self.kind == AddOnKind::Recurring
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn package_rejects_blank_name() {
        let err = Package::new(PackageId::new("x"), "  ", Money::from_whole(1)).unwrap_err();
        assert_eq!(err, ValidationError::BlankField("package name"));
    }

    #[test]
    fn package_rejects_negative_price() {
        let err = Package::new(PackageId::new("x"), "X", Money::from_whole(-5)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPrice { .. }));
    }

    #[test]
    fn package_rejects_absurd_price() {
        let result = Package::new(
            PackageId::new("x"),
            "X",
            Money::from_whole(MAX_MONTHLY_PRICE + 1),
        );
        assert!(result.is_err());
    }

    #[test]
    fn package_drops_blank_deliverables() {
        let package = Package::new(PackageId::new("x"), "X", Money::ZERO)
            .unwrap()
            .with_deliverables(["a", " ", "b"]);
        assert_eq!(package.deliverables(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn add_on_kind_from_tag() {
        assert_eq!(AddOnKind::from_tag(None), AddOnKind::Recurring);
        assert_eq!(AddOnKind::from_tag(Some("monthly")), AddOnKind::Recurring);
        assert_eq!(AddOnKind::from_tag(Some("One-Time")), AddOnKind::OneTime);
        assert_eq!(AddOnKind::from_tag(Some("one_time")), AddOnKind::OneTime);
        assert_eq!(AddOnKind::from_tag(Some("setup")), AddOnKind::OneTime);
        assert_eq!(AddOnKind::from_tag(Some("whatever")), AddOnKind::Recurring);
    }

    #[test]
    fn add_on_trims_name() {
        let add_on = AddOn::new(" CRM Setup ", Money::from_whole(500), AddOnKind::OneTime).unwrap();
        assert_eq!(add_on.name(), "CRM Setup");
        assert!(!add_on.is_recurring());
    }
}
