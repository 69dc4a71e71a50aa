//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! - [`Money`]: decimal currency amount with round-half-up to cents
//! - [`PaymentTerm`]: billing cadence with discount and multiplier
//! - [`EmailAddress`]: validated recipient
//! - [`Timestamp`]: UTC instant
//! - [`ProposalId`], [`PackageId`], [`ProviderId`]: identifiers

pub mod email;
pub mod ids;
pub mod money;
pub mod payment_term;
pub mod timestamp;

pub use email::EmailAddress;
pub use ids::{PackageId, ProposalId, ProviderId};
pub use money::Money;
pub use payment_term::{ParseEnumError, PaymentTerm};
pub use timestamp::Timestamp;
