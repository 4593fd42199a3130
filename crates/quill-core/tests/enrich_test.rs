//! Integration tests for the enrichment pipeline.
//!
//! Exercise `Enricher::enrich` end to end with in-process stand-ins for
//! the OCR engine and the remote summarizer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use quill_core::{
    EnrichConfig, EnrichError, Enricher, ErrorCode, RemoteReply, SummaryBranch, SummaryRequest,
    SummaryService, UNKNOWN_LANGUAGE,
};
use quill_extractors::{
    Document, DocumentKind, ExtractResult, ExtractionBranch, ExtractionMethod,
    ExtractionPipeline, ExtractionResult, Extractor, OcrEngine, OcrRequest, OcrSettings,
};

const SAMPLE: &str = "Contact me at a@b.com or +1 555-123-4567. This report analyzes quarterly \
    sales growth. Revenue increased. Costs decreased.";

/// Paginated extractor returning a fixed text layer.
struct ThinPdf;

#[async_trait]
impl Extractor for ThinPdf {
    async fn extract(&self, _content: &[u8]) -> ExtractResult<ExtractionResult> {
        Ok(ExtractionResult::paginated(
            "Scan".to_string(),
            ExtractionMethod::PaginatedRead,
            12,
        ))
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::Paginated
    }

    fn name(&self) -> &str {
        "thin-pdf"
    }
}

/// OCR engine returning one page per requested page and counting calls.
#[derive(Default)]
struct CountingOcr {
    calls: AtomicUsize,
}

impl OcrEngine for CountingOcr {
    fn recognize_pages(&self, _content: &[u8], request: &OcrRequest) -> ExtractResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((1..=request.max_pages)
            .map(|page| format!("Recognized page {page} discusses quarterly revenue growth."))
            .collect())
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Remote summarizer that always answers.
struct FixedSummary;

#[async_trait]
impl SummaryService for FixedSummary {
    async fn summarize(&self, request: &SummaryRequest) -> RemoteReply {
        assert!(request.input.chars().count() <= 12_000);
        assert!(!request.input.contains("a@b.com"));
        RemoteReply::Summary(" Sales grew while costs fell. ".to_string())
    }

    fn model_name(&self) -> String {
        "fixed".to_string()
    }
}

fn local_only() -> EnrichConfig {
    EnrichConfig::builder().disable_remote().build()
}

#[tokio::test]
async fn test_plain_text_end_to_end_with_local_summary() {
    let enricher = Enricher::from_config(&local_only(), None).unwrap();
    let document = Document::new("note.txt", SAMPLE.as_bytes().to_vec());

    let record = enricher.enrich(&document).await.unwrap();

    assert_eq!(record.file_name, "note.txt");
    assert_eq!(record.file_type, "txt");
    assert_eq!(record.file_size_bytes, SAMPLE.len());
    assert_eq!(record.text_extract_method, ExtractionMethod::PlainRead);
    assert_eq!(record.text_pages, None);
    assert_eq!(record.text_chars, SAMPLE.chars().count());
    assert_eq!(record.extraction_branch, ExtractionBranch::Native);

    assert!(!record.language.is_empty());
    assert_eq!(record.summary_branch, SummaryBranch::Local);
    assert_eq!(
        record.summary,
        "Contact me at or . This report analyzes quarterly sales growth. Revenue increased."
    );
    assert!(!record.summary.contains("a@b.com"));
    assert!(!record.summary.contains("555-123-4567"));

    assert!((5..=10).contains(&record.keywords.len()), "{:?}", record.keywords);
    for keyword in &record.keywords {
        assert!(!keyword.contains('@'));
    }
}

#[tokio::test]
async fn test_unsupported_extension_is_not_an_error() {
    let enricher = Enricher::from_config(&local_only(), None).unwrap();
    let document = Document::new("photo.png", vec![0x89, b'P', b'N', b'G']);

    let record = enricher.enrich(&document).await.unwrap();

    assert_eq!(record.text_extract_method, ExtractionMethod::Unsupported);
    assert_eq!(record.text_chars, 0);
    assert_eq!(record.text_pages, None);
    assert_eq!(record.file_type, "png");
    assert_eq!(record.language, UNKNOWN_LANGUAGE);
    assert_eq!(record.summary, "—");
    assert!(record.keywords.is_empty());
}

#[tokio::test]
async fn test_thin_pdf_escalates_to_ocr() {
    let ocr = Arc::new(CountingOcr::default());
    let settings = OcrSettings {
        max_pages: 3,
        ..Default::default()
    };
    let pipeline = ExtractionPipeline::new(settings)
        .add_extractor(Arc::new(ThinPdf))
        .with_ocr_engine(ocr.clone());

    let enricher = Enricher::from_config(&local_only(), None)
        .unwrap()
        .with_pipeline(pipeline);
    let record = enricher
        .enrich(&Document::new("scan.pdf", b"%PDF-1.4".to_vec()))
        .await
        .unwrap();

    assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
    assert_eq!(record.text_extract_method, ExtractionMethod::Ocr);
    assert_eq!(record.extraction_branch, ExtractionBranch::Ocr);
    assert_eq!(record.text_pages, Some(3));
    assert!(record.text.contains("Recognized page 3"));
}

#[tokio::test]
async fn test_long_english_text_uses_remote_summary() {
    let config = EnrichConfig::default();
    let enricher = Enricher::from_config(&config, Some(Arc::new(FixedSummary))).unwrap();

    let text = format!(
        "{SAMPLE} {}",
        "The sales team expects revenue growth to continue across every region next year. "
            .repeat(5)
    );
    let record = enricher
        .enrich(&Document::new("report.md", text.into_bytes()))
        .await
        .unwrap();

    assert_eq!(record.language, "en");
    assert_eq!(record.summary_branch, SummaryBranch::Remote);
    assert_eq!(record.summary, "Sales grew while costs fell.");
}

#[tokio::test]
async fn test_corrupt_document_fails_with_extraction_error() {
    let enricher = Enricher::from_config(&local_only(), None).unwrap();
    let err = enricher
        .enrich(&Document::new("broken.docx", b"not a zip archive".to_vec()))
        .await
        .unwrap_err();

    assert!(matches!(err, EnrichError::Extraction(_)));
    assert_eq!(err.code(), ErrorCode::ExtractionFailed);
    assert!(err.is_document_failure());
}
