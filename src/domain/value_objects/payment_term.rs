//! # Payment Terms
//!
//! Billing cadence with its fixed discount rate and billing multiplier.
//!
//! | Term         | Discount | Months billed |
//! |--------------|----------|---------------|
//! | `Monthly`    | 0%       | 1             |
//! | `Quarterly`  | 5%       | 3             |
//! | `SemiAnnual` | 10%      | 6             |
//! | `Annual`     | 15%      | 12            |
//!
//! # Examples
//!
//! ```
//! use proposal_dispatch::domain::value_objects::payment_term::PaymentTerm;
//!
//! assert_eq!(PaymentTerm::parse_lenient("ANNUAL"), PaymentTerm::Annual);
//! assert_eq!(PaymentTerm::parse_lenient("fortnightly"), PaymentTerm::Monthly);
//! assert_eq!(PaymentTerm::Quarterly.billing_multiplier(), 3);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an enum from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEnumError {
    /// The string does not name a known variant.
    #[error("invalid {0} value: '{1}'")]
    InvalidValue(&'static str, String),
}

/// Billing cadence selected by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum PaymentTerm {
    /// Billed every month, no discount.
    #[default]
    Monthly = 0,
    /// Billed every three months at 5% off.
    Quarterly = 1,
    /// Billed every six months at 10% off.
    SemiAnnual = 2,
    /// Billed yearly at 15% off.
    Annual = 3,
}

impl PaymentTerm {
    /// All terms, shortest cycle first.
    pub const ALL: [Self; 4] = [
        Self::Monthly,
        Self::Quarterly,
        Self::SemiAnnual,
        Self::Annual,
    ];

    /// Parses a term, falling back to [`PaymentTerm::Monthly`] for anything
    /// unrecognized.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// Discount as a fraction (`0.05` for 5%).
    #[must_use]
    pub fn discount_rate(self) -> Decimal {
        match self {
            Self::Monthly => Decimal::ZERO,
            Self::Quarterly => Decimal::new(5, 2),
            Self::SemiAnnual => Decimal::new(10, 2),
            Self::Annual => Decimal::new(15, 2),
        }
    }

    /// Discount as a whole percentage.
    #[must_use]
    pub const fn discount_percent(self) -> u32 {
        match self {
            Self::Monthly => 0,
            Self::Quarterly => 5,
            Self::SemiAnnual => 10,
            Self::Annual => 15,
        }
    }

    /// Number of months billed at once.
    #[must_use]
    pub const fn billing_multiplier(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::SemiAnnual => 6,
            Self::Annual => 12,
        }
    }

    /// Human readable label used in documents and emails.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::SemiAnnual => "Semi-Annual",
            Self::Annual => "Annual",
        }
    }

    /// Wire identifier (`semi-annual` etc.).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::SemiAnnual => "semi-annual",
            Self::Annual => "annual",
        }
    }
}

impl fmt::Display for PaymentTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentTerm {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "monthly" | "month" => Ok(Self::Monthly),
            "quarterly" | "quarter" => Ok(Self::Quarterly),
            "semi-annual" | "semiannual" | "semi-annually" | "biannual" => Ok(Self::SemiAnnual),
            "annual" | "annually" | "yearly" => Ok(Self::Annual),
            _ => Err(ParseEnumError::InvalidValue("PaymentTerm", s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn constants_table() {
        let table: Vec<(u32, u32)> = PaymentTerm::ALL
            .iter()
            .map(|t| (t.discount_percent(), t.billing_multiplier()))
            .collect();
        assert_eq!(table, vec![(0, 1), (5, 3), (10, 6), (15, 12)]);
    }

    #[test]
    fn discount_rate_matches_percent() {
        for term in PaymentTerm::ALL {
            assert_eq!(
                term.discount_rate() * Decimal::ONE_HUNDRED,
                Decimal::from(term.discount_percent())
            );
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("ANNUAL".parse::<PaymentTerm>().unwrap(), PaymentTerm::Annual);
        assert_eq!("Quarterly".parse::<PaymentTerm>().unwrap(), PaymentTerm::Quarterly);
        assert_eq!(" monthly ".parse::<PaymentTerm>().unwrap(), PaymentTerm::Monthly);
    }

    #[test]
    fn parse_semi_annual_spellings() {
        for raw in ["semi-annual", "SEMI_ANNUAL", "semiannual", "Semi Annual"] {
            assert_eq!(raw.parse::<PaymentTerm>().unwrap(), PaymentTerm::SemiAnnual);
        }
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        let err = "weekly".parse::<PaymentTerm>().unwrap_err();
        assert_eq!(err.to_string(), "invalid PaymentTerm value: 'weekly'");
    }

    #[test]
    fn lenient_parse_defaults_to_monthly() {
        assert_eq!(PaymentTerm::parse_lenient("weekly"), PaymentTerm::Monthly);
        assert_eq!(PaymentTerm::parse_lenient(""), PaymentTerm::Monthly);
        assert_eq!(PaymentTerm::parse_lenient("ANNUAL"), PaymentTerm::Annual);
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&PaymentTerm::SemiAnnual).unwrap();
        assert_eq!(json, "\"semi-annual\"");
        let parsed: PaymentTerm = serde_json::from_str("\"annual\"").unwrap();
        assert_eq!(parsed, PaymentTerm::Annual);
    }
}
