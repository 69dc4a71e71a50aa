//! # Document Renderer Trait
//!
//! Port definition for proposal document generation.
//!
//! A [`DocumentRenderer`] turns a [`PricedProposal`] into a
//! [`RenderedDocument`]: the bytes of a single printable file plus the name
//! it is attached under.

use crate::domain::entities::proposal::PricedProposal;
use crate::infrastructure::rendering::error::RenderResult;
use std::fmt;

/// A finished document, ready to attach.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    filename: String,
    content_type: &'static str,
    bytes: Vec<u8>,
}

impl RenderedDocument {
    /// MIME type of rendered proposals.
    pub const PDF: &'static str = "application/pdf";

    /// Creates a PDF document.
    #[must_use]
    pub fn pdf(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: Self::PDF,
            bytes,
        }
    }

    /// Returns the attachment filename.
    #[inline]
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the MIME type.
    #[inline]
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Returns the raw bytes.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the size in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the document has no content.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the content as standard base64, as mail APIs expect.
    #[must_use]
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Consumes the document, returning its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Debug for RenderedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedDocument")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Builds the attachment filename for a company: `Acme-Corp-Proposal.pdf`.
///
/// Anything other than ASCII letters and digits collapses into single
/// hyphens.
#[must_use]
pub fn proposal_filename(company: &str) -> String {
    let mut slug = String::with_capacity(company.len());
    for ch in company.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "Proposal.pdf".to_string()
    } else {
        format!("{}-Proposal.pdf", slug)
    }
}

/// Renders a priced proposal into a document.
///
/// Implementations must be deterministic: the same proposal (including its
/// timestamp and id) yields the same bytes.
pub trait DocumentRenderer: Send + Sync + fmt::Debug {
    /// Renders the proposal.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`](crate::infrastructure::rendering::error::RenderError)
    /// only when document construction itself fails.
    fn render(&self, proposal: &PricedProposal) -> RenderResult<RenderedDocument>;
}
