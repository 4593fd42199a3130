//! Extraction pipeline: route by document kind, escalate thin PDFs to OCR.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ExtractError, ExtractResult};
use crate::factory::ExtractionSettings;
use crate::ocr::{OcrEngine, OcrSettings};
use crate::types::{Document, DocumentKind, ExtractionMethod, ExtractionResult};
use crate::{Extractor, UnsupportedExtractor};

/// Which branch of the native -> OCR chain produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionBranch {
    Native,
    Ocr,
}

/// Extraction result tagged with the branch taken.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub result: ExtractionResult,
    pub branch: ExtractionBranch,
}

/// Pipeline for extracting content using registered extractors.
///
/// Routes content to the extractor for the document's kind. Paginated
/// documents whose native text falls below the OCR threshold are
/// re-extracted through the configured [`OcrEngine`].
pub struct ExtractionPipeline {
    extractors: Vec<Arc<dyn Extractor>>,
    ocr_engine: Option<Arc<dyn OcrEngine>>,
    settings: OcrSettings,
}

impl ExtractionPipeline {
    /// Create new empty pipeline.
    pub fn new(settings: OcrSettings) -> Self {
        Self {
            extractors: Vec::new(),
            ocr_engine: None,
            settings,
        }
    }

    /// Create pipeline with all available extractors and the default OCR engine.
    pub fn with_defaults(settings: OcrSettings) -> Self {
        Self::from_settings(&ExtractionSettings::default(), settings)
    }

    /// Like [`with_defaults`](Self::with_defaults), with explicit native
    /// extraction options.
    pub fn from_settings(extraction: &ExtractionSettings, settings: OcrSettings) -> Self {
        Self {
            extractors: crate::ExtractorFactory::all(extraction),
            #[cfg(feature = "ocr")]
            ocr_engine: Some(crate::ExtractorFactory::ocr()),
            #[cfg(not(feature = "ocr"))]
            ocr_engine: None,
            settings,
        }
    }

    /// Add an extractor to the pipeline. Earlier registrations win.
    pub fn add_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// Use a specific OCR engine.
    pub fn with_ocr_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.ocr_engine = Some(engine);
        self
    }

    pub fn settings(&self) -> &OcrSettings {
        &self.settings
    }

    /// Check if pipeline has a native extractor for a document kind.
    pub fn supports(&self, kind: DocumentKind) -> bool {
        self.extractors.iter().any(|e| e.supports(kind))
    }

    fn extractor_for(&self, kind: DocumentKind) -> Arc<dyn Extractor> {
        self.extractors
            .iter()
            .find(|e| e.supports(kind))
            .cloned()
            .unwrap_or_else(|| Arc::new(UnsupportedExtractor))
    }

    /// Native extraction only.
    pub async fn extract(&self, document: &Document) -> ExtractResult<ExtractionResult> {
        let extractor = self.extractor_for(document.kind());
        debug!(
            file_name = document.file_name(),
            extractor = extractor.name(),
            "Extracting document"
        );
        extractor.extract(document.content()).await
    }

    /// Native extraction, escalating to OCR for thin paginated documents.
    pub async fn extract_with_fallback(
        &self,
        document: &Document,
    ) -> ExtractResult<ExtractionOutcome> {
        let native = self.extract(document).await?;

        if !document.kind().is_paginated() || native.chars >= self.settings.threshold_chars {
            return Ok(ExtractionOutcome {
                result: native,
                branch: ExtractionBranch::Native,
            });
        }

        info!(
            file_name = document.file_name(),
            chars = native.chars,
            threshold = self.settings.threshold_chars,
            "Native text below threshold, falling back to OCR"
        );

        let result = self.ocr(document).await?;
        Ok(ExtractionOutcome {
            result,
            branch: ExtractionBranch::Ocr,
        })
    }

    /// Rasterize and recognize up to `max_pages` pages of a document.
    pub async fn ocr(&self, document: &Document) -> ExtractResult<ExtractionResult> {
        let engine = self
            .ocr_engine
            .clone()
            .ok_or_else(|| ExtractError::Ocr("No OCR engine configured".to_string()))?;

        let content = document.content().to_vec();
        let request = self.settings.request();
        let max_pages = request.max_pages;

        let mut pages = tokio::task::spawn_blocking(move || {
            engine.recognize_pages(&content, &request)
        })
        .await
        .map_err(|e| ExtractError::Ocr(format!("OCR task failed: {}", e)))??;
        pages.truncate(max_pages);

        let page_count = pages.len();
        Ok(ExtractionResult::paginated(
            pages.join("\n"),
            ExtractionMethod::Ocr,
            page_count,
        ))
    }

    /// Get the number of registered extractors.
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Check if the pipeline has no registered extractors.
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::with_defaults(OcrSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{MockOcrEngine, OcrRequest};
    use crate::{FailureKind, PlainTextExtractor};
    use async_trait::async_trait;

    /// Paginated extractor returning canned text.
    struct CannedPdf {
        text: String,
        pages: usize,
    }

    #[async_trait]
    impl Extractor for CannedPdf {
        async fn extract(&self, _content: &[u8]) -> ExtractResult<ExtractionResult> {
            Ok(ExtractionResult::paginated(
                self.text.clone(),
                ExtractionMethod::PaginatedRead,
                self.pages,
            ))
        }

        fn kind(&self) -> DocumentKind {
            DocumentKind::Paginated
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    fn pipeline_with(text: &str, pages: usize, engine: MockOcrEngine) -> ExtractionPipeline {
        ExtractionPipeline::new(OcrSettings {
            threshold_chars: 250,
            max_pages: 3,
            ..Default::default()
        })
        .add_extractor(Arc::new(PlainTextExtractor::new()))
        .add_extractor(Arc::new(CannedPdf {
            text: text.to_string(),
            pages,
        }))
        .with_ocr_engine(Arc::new(engine))
    }

    #[test]
    fn test_pipeline_empty() {
        let pipeline = ExtractionPipeline::new(OcrSettings::default());
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.len(), 0);
        assert!(!pipeline.supports(DocumentKind::PlainText));
    }

    #[test]
    fn test_pipeline_with_defaults() {
        let pipeline = ExtractionPipeline::default();
        assert!(pipeline.supports(DocumentKind::PlainText));
        assert!(!pipeline.supports(DocumentKind::Unsupported));

        #[cfg(feature = "pdf")]
        assert!(pipeline.supports(DocumentKind::Paginated));

        #[cfg(feature = "docx")]
        assert!(pipeline.supports(DocumentKind::Structured));
    }

    #[cfg(feature = "docx")]
    #[tokio::test]
    async fn test_table_text_follows_settings() {
        use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};

        let cell = |text: &str| {
            TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
        };
        let mut buf = std::io::Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Budget")))
            .add_table(Table::new(vec![TableRow::new(vec![cell("Q1"), cell("120")])]))
            .build()
            .pack(&mut buf)
            .unwrap();
        let document = Document::new("budget.docx", buf.into_inner());

        let plain = ExtractionPipeline::with_defaults(OcrSettings::default());
        assert_eq!(plain.extract(&document).await.unwrap().text, "Budget");

        let tables = ExtractionPipeline::from_settings(
            &ExtractionSettings {
                include_tables: true,
            },
            OcrSettings::default(),
        );
        assert_eq!(tables.extract(&document).await.unwrap().text, "Budget\nQ1 | 120");
    }

    #[tokio::test]
    async fn test_thin_pdf_escalates_to_ocr() {
        let mut engine = MockOcrEngine::new();
        engine
            .expect_recognize_pages()
            .times(1)
            .withf(|_, request| request.max_pages == 3 && request.languages == "rus+eng")
            .returning(|_, _| Ok(vec!["Scanned page one".into(), "Scanned page two".into()]));

        let pipeline = pipeline_with("  ", 12, engine);
        let document = Document::new("scan.pdf", b"%PDF".to_vec());
        let outcome = pipeline.extract_with_fallback(&document).await.unwrap();

        assert_eq!(outcome.branch, ExtractionBranch::Ocr);
        assert_eq!(outcome.result.method, ExtractionMethod::Ocr);
        assert_eq!(outcome.result.text, "Scanned page one\nScanned page two");
        assert_eq!(outcome.result.pages, Some(2));
        assert_eq!(outcome.result.chars, outcome.result.text.chars().count());
    }

    #[tokio::test]
    async fn test_ocr_page_count_capped_at_max_pages() {
        let mut engine = MockOcrEngine::new();
        engine
            .expect_recognize_pages()
            .times(1)
            .returning(|_, _| Ok((1..=6).map(|i| format!("page {i}")).collect()));

        let pipeline = pipeline_with("", 40, engine);
        let outcome = pipeline
            .extract_with_fallback(&Document::new("long.pdf", vec![]))
            .await
            .unwrap();

        assert_eq!(outcome.result.method, ExtractionMethod::Ocr);
        assert!(outcome.result.pages.unwrap() <= pipeline.settings().max_pages);
    }

    #[tokio::test]
    async fn test_rich_pdf_never_invokes_ocr() {
        let mut engine = MockOcrEngine::new();
        engine.expect_recognize_pages().times(0);

        let text = "word ".repeat(60);
        let pipeline = pipeline_with(&text, 2, engine);
        let outcome = pipeline
            .extract_with_fallback(&Document::new("report.pdf", vec![]))
            .await
            .unwrap();

        assert_eq!(outcome.branch, ExtractionBranch::Native);
        assert_eq!(outcome.result.method, ExtractionMethod::PaginatedRead);
        assert_eq!(outcome.result.pages, Some(2));
    }

    #[tokio::test]
    async fn test_short_plain_text_never_invokes_ocr() {
        let mut engine = MockOcrEngine::new();
        engine.expect_recognize_pages().times(0);

        let pipeline = pipeline_with("", 1, engine);
        let outcome = pipeline
            .extract_with_fallback(&Document::new("note.txt", b"tiny".to_vec()))
            .await
            .unwrap();

        assert_eq!(outcome.branch, ExtractionBranch::Native);
        assert_eq!(outcome.result.method, ExtractionMethod::PlainRead);
        assert_eq!(outcome.result.text, "tiny");
    }

    #[tokio::test]
    async fn test_unsupported_document_is_empty_result() {
        let mut engine = MockOcrEngine::new();
        engine.expect_recognize_pages().times(0);

        let pipeline = pipeline_with("", 1, engine);
        let outcome = pipeline
            .extract_with_fallback(&Document::new("photo.png", vec![0x89, 0x50]))
            .await
            .unwrap();

        assert_eq!(outcome.result.method, ExtractionMethod::Unsupported);
        assert_eq!(outcome.result.chars, 0);
        assert!(outcome.result.pages.is_none());
    }

    #[tokio::test]
    async fn test_ocr_engine_failure_propagates() {
        let mut engine = MockOcrEngine::new();
        engine
            .expect_recognize_pages()
            .times(1)
            .returning(|_, _| Err(ExtractError::Ocr("tesseract not installed".into())));

        let pipeline = pipeline_with("", 1, engine);
        let err = pipeline
            .extract_with_fallback(&Document::new("scan.pdf", vec![]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Ocr);
    }

    #[tokio::test]
    async fn test_crashed_ocr_task_is_ocr_failure() {
        struct CrashingOcr;

        impl OcrEngine for CrashingOcr {
            fn recognize_pages(&self, _: &[u8], _: &OcrRequest) -> ExtractResult<Vec<String>> {
                panic!("engine crashed")
            }

            fn name(&self) -> &str {
                "crashing"
            }
        }

        let pipeline = pipeline_with("", 1, MockOcrEngine::new())
            .with_ocr_engine(Arc::new(CrashingOcr));
        let err = pipeline
            .extract_with_fallback(&Document::new("scan.pdf", vec![]))
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractError::Ocr(_)), "{err:?}");
        assert_eq!(err.kind(), FailureKind::Ocr);
    }

    #[tokio::test]
    async fn test_missing_ocr_engine_is_ocr_failure() {
        let pipeline = ExtractionPipeline::new(OcrSettings::default()).add_extractor(Arc::new(
            CannedPdf {
                text: String::new(),
                pages: 1,
            },
        ));

        let err = pipeline
            .extract_with_fallback(&Document::new("scan.pdf", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Ocr(_)));
    }
}
