//! # Render Errors
//!
//! Failures while constructing a document. These never stem from proposal
//! content; they indicate the encoder itself could not complete.

use thiserror::Error;

/// Error type for document rendering.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// A font could not be registered with the document.
    #[error("render font error: {message}")]
    Font {
        /// Error message.
        message: String,
    },

    /// Document metadata (dates, identifiers) could not be set.
    #[error("render metadata error: {message}")]
    Metadata {
        /// Error message.
        message: String,
    },

    /// The document could not be serialized to bytes.
    #[error("render encoding error: {message}")]
    Encoding {
        /// Error message.
        message: String,
    },
}

impl RenderError {
    /// Creates a font error.
    #[must_use]
    pub fn font(message: impl Into<String>) -> Self {
        Self::Font {
            message: message.into(),
        }
    }

    /// Creates a metadata error.
    #[must_use]
    pub fn metadata(message: impl Into<String>) -> Self {
        Self::Metadata {
            message: message.into(),
        }
    }

    /// Creates an encoding error.
    #[must_use]
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }
}

/// Result type for rendering.
pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        assert_eq!(
            RenderError::encoding("buffer closed").to_string(),
            "render encoding error: buffer closed"
        );
        assert!(RenderError::font("missing").to_string().contains("font"));
    }
}
