//! Error types for OOXML operations

use thiserror::Error;

/// Errors that can occur while reading and resolving a document package
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// Error reading the ZIP container
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error emitted by the XML writer during normalization
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A part's XML is not well-formed
    #[error("Malformed document part {part}: {reason}")]
    MalformedDocument {
        /// Part name, e.g. `word/document.xml`
        part: String,
        /// What the reader rejected
        reason: String,
    },

    /// A required part is absent from the package
    #[error("Required part not found: {0}")]
    PartMissing(String),

    /// A list-definition id could not be resolved to a numbering format
    #[error("Numbering style not found: {0}")]
    StyleNotFound(String),

    /// A comment id is absent from the comments part
    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    /// A comment was referenced but the package has no comments part
    #[error("Document references comments but has no comments part")]
    CommentsUnavailable,
}

impl OoxmlError {
    /// Build a [`OoxmlError::MalformedDocument`] for the given part
    pub fn malformed(part: &str, reason: impl ToString) -> Self {
        OoxmlError::MalformedDocument {
            part: part.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for OOXML operations
pub type Result<T> = std::result::Result<T, OoxmlError>;
