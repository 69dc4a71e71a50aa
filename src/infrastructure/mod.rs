//! # Infrastructure Layer
//!
//! Adapters for the outside world: document rendering and email delivery.

pub mod delivery;
pub mod rendering;
