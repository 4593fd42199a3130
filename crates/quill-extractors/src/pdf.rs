//! PDF content extraction using pdf-extract.

use crate::error::{ExtractError, ExtractResult};
use crate::types::{DocumentKind, ExtractionMethod, ExtractionResult};
use crate::Extractor;
use async_trait::async_trait;

/// PDF content extractor using pdf-extract library.
///
/// Reads the native text layer page by page, wrapping synchronous
/// pdf-extract calls in spawn_blocking to avoid blocking the async
/// runtime. Image-only PDFs come back with little or no text; the
/// pipeline decides whether that warrants OCR.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create new PDF extractor.
    pub fn new() -> Self {
        Self
    }

    fn extract_sync(content: Vec<u8>) -> Result<Vec<String>, ExtractError> {
        // pdf-extract panics on some malformed inputs; treat that as corruption.
        std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(&content))
            .map_err(|_| ExtractError::Pdf("PDF parser panicked on malformed input".to_string()))?
            .map_err(|e| ExtractError::Pdf(format!("Failed to parse PDF: {}", e)))
    }
}

#[async_trait]
impl Extractor for PdfExtractor {
    async fn extract(&self, content: &[u8]) -> ExtractResult<ExtractionResult> {
        let content = content.to_vec();

        let pages = tokio::task::spawn_blocking(move || Self::extract_sync(content)).await??;
        let page_count = pages.len();

        Ok(ExtractionResult::paginated(
            pages.join("\n"),
            ExtractionMethod::PaginatedRead,
            page_count,
        ))
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::Paginated
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extractor_creation() {
        let extractor = PdfExtractor::new();
        assert_eq!(extractor.name(), "pdf-extract");
        assert!(extractor.supports(DocumentKind::Paginated));
        assert!(!extractor.supports(DocumentKind::Structured));
    }

    #[tokio::test]
    async fn test_pdf_corrupt_content_is_an_error() {
        let result = PdfExtractor::new().extract(b"%PDF-1.4 garbage").await;
        assert!(matches!(result, Err(ExtractError::Pdf(_))));
    }
}
