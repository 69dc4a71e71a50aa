//! # Proposal Dispatch
//!
//! Prices service-package selections, renders them as PDF proposals and
//! emails them through an ordered chain of delivery providers, falling over
//! to the next provider when one fails.
//!
//! # Architecture
//!
//! - [`domain`]: packages, payment terms, pricing and delivery records
//! - [`application`]: request validation, the proposal pipeline and
//!   provider fail-over
//! - [`infrastructure`]: PDF rendering plus the Resend, EmailJS and SMTP
//!   adapters
//! - [`api`]: axum REST endpoints
//! - [`settings`]: layered startup configuration
//! - [`telemetry`]: tracing subscriber setup
//!
//! # Example
//!
//! ```
//! use proposal_dispatch::domain::entities::{Package, SelectionRequest};
//! use proposal_dispatch::domain::services::PricingEngine;
//! use proposal_dispatch::domain::value_objects::{EmailAddress, Money, PackageId, PaymentTerm};
//!
//! let package = Package::new(PackageId::new("growth"), "Growth", Money::from_whole(4200)).unwrap();
//! let selection = SelectionRequest::new(
//!     EmailAddress::parse("client@example.com").unwrap(),
//!     package,
//!     Vec::new(),
//!     PaymentTerm::Annual,
//!     None,
//!     Some("Acme"),
//! );
//! let proposal = PricingEngine::new().price(&selection);
//! assert_eq!(proposal.discounted_monthly(), Money::from_whole(3570));
//! ```

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod settings;
pub mod telemetry;
