//! # Domain Services
//!
//! Pure business logic that spans entities.
//!
//! - [`pricing::PricingEngine`]: selection to priced proposal
//! - [`prospects`]: monthly prospect estimate for a package

pub mod pricing;
pub mod prospects;

pub use pricing::PricingEngine;
