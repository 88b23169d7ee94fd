//! # Render Error Types

use thiserror::Error;

/// Errors produced while building or saving a document.
///
/// A failed logo load is not an error: the document renders without it.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The PDF backend rejected the document.
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// An image could not be decoded.
    #[error("Invalid image: {0}")]
    Image(String),

    /// Reading the logo or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
