//! # Application Layer
//!
//! Use cases on top of the domain: request validation, the proposal
//! pipeline and provider fail-over.

pub mod dto;
pub mod error;
pub mod services;

pub use dto::ProposalRequest;
pub use error::{ApplicationError, ApplicationResult, ConfigError};
pub use services::{DeliveryOrchestrator, ProposalService};
