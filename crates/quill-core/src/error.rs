//! Error types for quill operations.
//!
//! Only extraction and OCR failures ever reach the caller of
//! [`Enricher::enrich`](crate::Enricher::enrich). Remote summarization
//! and language detection failures are absorbed by their fallbacks.

use quill_extractors::{ExtractError, FailureKind};
use thiserror::Error;

/// Result type alias for quill operations.
pub type EnrichResult<T> = Result<T, EnrichError>;

/// Main error type for all quill operations.
#[derive(Error, Debug)]
pub enum EnrichError {
    /// The document could not be turned into text.
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Background task failed to complete.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Source file unreadable or corrupt (EXT_001).
    ExtractionFailed,
    /// Rasterization or recognition failed (OCR_001).
    OcrFailed,
    /// Invalid configuration (CFG_001).
    ConfigInvalid,
    /// Filesystem failure (IO_001).
    IoFailed,
    /// JSON failure (SER_001).
    SerializationFailed,
    /// Anything else (INT_001).
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ExtractionFailed => "EXT_001",
            ErrorCode::OcrFailed => "OCR_001",
            ErrorCode::ConfigInvalid => "CFG_001",
            ErrorCode::IoFailed => "IO_001",
            ErrorCode::SerializationFailed => "SER_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl EnrichError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            EnrichError::Extraction(e) => match e.kind() {
                FailureKind::Ocr => ErrorCode::OcrFailed,
                FailureKind::Extraction => ErrorCode::ExtractionFailed,
            },
            EnrichError::Configuration(_) => ErrorCode::ConfigInvalid,
            EnrichError::Io(_) => ErrorCode::IoFailed,
            EnrichError::Serialization(_) => ErrorCode::SerializationFailed,
            EnrichError::TaskJoin(_) => ErrorCode::Internal,
        }
    }

    /// Whether this error means the document itself failed, as opposed
    /// to a problem with the host or configuration.
    pub fn is_document_failure(&self) -> bool {
        matches!(self, EnrichError::Extraction(_))
    }
}
