//! Extraction error types.

use thiserror::Error;

/// Errors that can occur during content extraction.
///
/// Unsupported formats are not an error: they produce an empty
/// [`ExtractionResult`](crate::ExtractionResult) instead.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Extraction process failed.
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// IO error during extraction.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF-specific extraction error.
    #[cfg(feature = "pdf")]
    #[error("PDF extraction error: {0}")]
    Pdf(String),

    /// DOCX-specific extraction error.
    #[cfg(feature = "docx")]
    #[error("DOCX extraction error: {0}")]
    Docx(String),

    /// Rasterization or recognition engine failure.
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// Task join error from spawn_blocking.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Coarse classification of a failed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The source file could not be read natively (corrupt, unreadable).
    Extraction,
    /// The OCR fallback could not produce text.
    Ocr,
}

impl ExtractError {
    /// Which stage of extraction failed.
    pub fn kind(&self) -> FailureKind {
        match self {
            ExtractError::Ocr(_) => FailureKind::Ocr,
            _ => FailureKind::Extraction,
        }
    }
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;
