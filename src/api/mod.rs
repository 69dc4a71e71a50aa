//! # API Layer
//!
//! Inbound HTTP interface.

pub mod rest;
