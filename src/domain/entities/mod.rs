//! # Domain Entities
//!
//! Reference data, validated inputs and derived results.
//!
//! ## Reference data
//!
//! - [`Package`], [`AddOn`]: what a client can choose
//! - [`PackageCatalog`]: packages keyed by id
//!
//! ## Per-request
//!
//! - [`SelectionRequest`]: validated client selection
//! - [`PricedProposal`]: pricing output
//! - [`DeliveryAttempt`], [`DeliveryResult`]: delivery outcome

pub mod catalog;
pub mod delivery;
pub mod package;
pub mod proposal;
pub mod selection;

pub use catalog::PackageCatalog;
pub use delivery::{AttemptOutcome, DeliveryAttempt, DeliveryResult};
pub use package::{AddOn, AddOnKind, Package};
pub use proposal::{LineItem, PricedProposal};
pub use selection::SelectionRequest;
