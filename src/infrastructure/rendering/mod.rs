//! # Document Rendering
//!
//! Turns priced proposals into printable documents.
//!
//! [`layout`] decides what goes where; [`pdf`] draws it. The
//! [`DocumentRenderer`] port lets the application layer stay unaware of the
//! output format.

pub mod error;
pub mod layout;
pub mod pdf;
pub mod traits;

pub use error::{RenderError, RenderResult};
pub use layout::RenderOptions;
pub use pdf::PdfRenderer;
pub use traits::{DocumentRenderer, RenderedDocument};
