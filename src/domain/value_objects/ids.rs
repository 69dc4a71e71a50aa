//! # Identifiers
//!
//! UUID-based and string-based identifiers.
//!
//! - [`ProposalId`]: generated per priced proposal
//! - [`PackageId`]: catalog key for a package
//! - [`ProviderId`]: configured delivery provider name

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a priced proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalId(Uuid);

impl ProposalId {
    /// Creates a random (v4) identifier.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Short uppercase reference shown to clients (first eight hex digits).
    #[must_use]
    pub fn reference(&self) -> String {
        let simple = self.0.simple().to_string();
        simple.chars().take(8).collect::<String>().to_uppercase()
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

string_id!(
    /// Catalog key of a package (e.g. `growth`).
    PackageId
);

string_id!(
    /// Name of a configured delivery provider (e.g. `primary`).
    ProviderId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proposal_reference_is_short_uppercase() {
        let id = ProposalId::from_uuid(Uuid::from_u128(0xabcdef12_3456_7890_abcd_ef1234567890));
        assert_eq!(id.reference(), "ABCDEF12");
    }

    #[test]
    fn string_ids_display() {
        assert_eq!(ProviderId::new("primary").to_string(), "primary");
        assert_eq!(PackageId::from("growth").as_str(), "growth");
    }
}
