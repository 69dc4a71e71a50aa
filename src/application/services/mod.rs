//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`ProposalService`]: validate, price, render and deliver a proposal
//! - [`DeliveryOrchestrator`]: ordered fail-over across delivery providers

pub mod delivery_orchestrator;
pub mod proposal_service;

pub use delivery_orchestrator::{DeliveryOrchestrator, DeliveryState};
pub use proposal_service::ProposalService;
