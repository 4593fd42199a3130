//! quill-extractors - Format-aware text extraction for document enrichment.
//!
//! Provides extractors for plain text, DOCX and PDF content behind a
//! unified trait-based interface, plus an OCR escalation step for
//! paginated documents whose native text layer is too thin.
//!
//! # Features
//!
//! - `pdf` (default) - PDF text extraction via pdf-extract
//! - `docx` (default) - DOCX text extraction via docx-rs
//! - `ocr` (default) - Page rasterization (`pdftoppm`) + tesseract OCR
//!
//! # Example
//!
//! ```ignore
//! use quill_extractors::{Document, ExtractionPipeline, OcrSettings};
//!
//! let pipeline = ExtractionPipeline::with_defaults(OcrSettings::default());
//! let document = Document::from_path("report.pdf")?;
//! let outcome = pipeline.extract_with_fallback(&document).await?;
//! println!("{} chars via {}", outcome.result.chars, outcome.result.method);
//! ```

mod error;
mod factory;
mod ocr;
mod pipeline;
mod plain;
mod types;

#[cfg(feature = "pdf")]
mod pdf;

#[cfg(feature = "docx")]
mod docx;

pub use error::{ExtractError, ExtractResult, FailureKind};
pub use factory::{ExtractionSettings, ExtractorFactory};
pub use ocr::{OcrEngine, OcrRequest, OcrSettings};
pub use pipeline::{ExtractionBranch, ExtractionOutcome, ExtractionPipeline};
pub use plain::{PlainTextExtractor, UnsupportedExtractor};
pub use types::{Document, DocumentKind, ExtractionMethod, ExtractionResult};

#[cfg(feature = "ocr")]
pub use ocr::TesseractOcr;

#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;

#[cfg(feature = "docx")]
pub use docx::DocxExtractor;

use async_trait::async_trait;

/// Core Extractor trait - one implementation per document kind.
///
/// Extractors are selected by [`DocumentKind`], which is a pure function
/// of the file extension.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract text content from bytes.
    async fn extract(&self, content: &[u8]) -> ExtractResult<ExtractionResult>;

    /// Document kind this extractor handles.
    fn kind(&self) -> DocumentKind;

    /// Check if this extractor handles the given document kind.
    fn supports(&self, kind: DocumentKind) -> bool {
        self.kind() == kind
    }

    /// Human-readable name for this extractor.
    fn name(&self) -> &str;
}
