//! Factory for creating extractors.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Extractor, PlainTextExtractor};

#[cfg(feature = "pdf")]
use crate::PdfExtractor;

#[cfg(feature = "docx")]
use crate::DocxExtractor;

#[cfg(feature = "ocr")]
use crate::ocr::{OcrEngine, TesseractOcr};

/// Native extraction options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Emit structured-document table text after the paragraphs.
    pub include_tables: bool,
}

/// Factory for creating content extractors.
pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Create a plain text extractor.
    pub fn plain() -> Arc<dyn Extractor> {
        Arc::new(PlainTextExtractor::new())
    }

    /// Create a PDF extractor.
    #[cfg(feature = "pdf")]
    pub fn pdf() -> Arc<dyn Extractor> {
        Arc::new(PdfExtractor::new())
    }

    /// Create a DOCX extractor.
    #[cfg(feature = "docx")]
    pub fn docx(include_tables: bool) -> Arc<dyn Extractor> {
        Arc::new(DocxExtractor::new().with_tables(include_tables))
    }

    /// Create the default OCR engine.
    #[cfg(feature = "ocr")]
    pub fn ocr() -> Arc<dyn OcrEngine> {
        Arc::new(TesseractOcr::new())
    }

    /// Get all available extractors.
    #[allow(clippy::vec_init_then_push)]
    #[cfg_attr(not(feature = "docx"), allow(unused_variables))]
    pub fn all(settings: &ExtractionSettings) -> Vec<Arc<dyn Extractor>> {
        let mut extractors: Vec<Arc<dyn Extractor>> = Vec::new();

        extractors.push(Self::plain());

        #[cfg(feature = "pdf")]
        extractors.push(Self::pdf());

        #[cfg(feature = "docx")]
        extractors.push(Self::docx(settings.include_tables));

        extractors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentKind;

    #[test]
    fn test_factory_all_extractors() {
        let extractors = ExtractorFactory::all(&ExtractionSettings::default());

        #[cfg(all(feature = "pdf", feature = "docx"))]
        assert_eq!(extractors.len(), 3);

        #[cfg(all(feature = "pdf", not(feature = "docx")))]
        assert_eq!(extractors.len(), 2);

        #[cfg(not(any(feature = "pdf", feature = "docx")))]
        assert_eq!(extractors.len(), 1);

        assert_eq!(extractors[0].kind(), DocumentKind::PlainText);
    }

    #[test]
    fn test_settings_default_excludes_tables() {
        assert!(!ExtractionSettings::default().include_tables);
        let parsed: ExtractionSettings = serde_json::from_str(r#"{"include_tables": true}"#).unwrap();
        assert!(parsed.include_tables);
    }

    #[cfg(feature = "docx")]
    #[test]
    fn test_factory_docx() {
        let extractor = ExtractorFactory::docx(true);
        assert!(extractor.supports(DocumentKind::Structured));
        assert_eq!(extractor.name(), "docx-rs");
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_factory_pdf() {
        let extractor = ExtractorFactory::pdf();
        assert!(extractor.supports(DocumentKind::Paginated));
        assert_eq!(extractor.name(), "pdf-extract");
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn test_factory_ocr() {
        assert_eq!(ExtractorFactory::ocr().name(), "tesseract");
    }
}
