//! # Domain Layer
//!
//! Pure business types and rules: packages, selections, pricing and
//! delivery records. Nothing here performs I/O.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
