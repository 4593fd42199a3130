//! The enrichment pipeline: extract, scrub, detect, summarize, keywords.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use quill_extractors::{Document, ExtractionBranch, ExtractionMethod, ExtractionPipeline};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::EnrichConfig;
use crate::error::EnrichResult;
use crate::keywords::KeywordExtractor;
use crate::language::LanguageDetector;
use crate::scrub::scrub_contacts;
use crate::summarize::{SummaryBranch, Summarizer};
use crate::traits::SummaryService;

/// Everything produced for one document. Owned by the caller; nothing
/// is persisted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub file_name: String,
    pub file_type: String,
    pub file_size_bytes: usize,
    pub text_extract_method: ExtractionMethod,
    pub text_pages: Option<usize>,
    pub text_chars: usize,
    /// Detected code or `"unknown"`.
    pub language: String,
    pub summary: String,
    pub keywords: Vec<String>,
    pub extraction_branch: ExtractionBranch,
    pub summary_branch: SummaryBranch,
    /// Extracted text, before scrubbing.
    pub text: String,
}

impl EnrichmentRecord {
    /// Keywords as a single comma separated line.
    pub fn keywords_line(&self) -> String {
        self.keywords.join(", ")
    }
}

/// Runs the whole pipeline for one document at a time. Cheap to share
/// behind an `Arc`; all state is read-only.
pub struct Enricher {
    pipeline: ExtractionPipeline,
    detector: LanguageDetector,
    summarizer: Summarizer,
    keywords: Arc<KeywordExtractor>,
}

impl Enricher {
    pub fn new(
        pipeline: ExtractionPipeline,
        detector: LanguageDetector,
        summarizer: Summarizer,
        keywords: KeywordExtractor,
    ) -> Self {
        Self {
            pipeline,
            detector,
            summarizer,
            keywords: Arc::new(keywords),
        }
    }

    /// Build every stage from configuration. `service` is the remote
    /// summarizer, if any; it is still subject to `summary.enable_remote`.
    pub fn from_config(
        config: &EnrichConfig,
        service: Option<Arc<dyn SummaryService>>,
    ) -> EnrichResult<Self> {
        let mut summarizer = Summarizer::new(config.summary.clone(), config.retry.clone());
        if let Some(service) = service {
            summarizer = summarizer.with_service(service);
        }

        Ok(Self::new(
            ExtractionPipeline::from_settings(&config.extraction, config.ocr.clone()),
            LanguageDetector::new(config.language.clone()),
            summarizer,
            KeywordExtractor::from_config(config.keywords.clone())?,
        ))
    }

    /// Replace the extraction stage, e.g. with a custom OCR engine.
    pub fn with_pipeline(mut self, pipeline: ExtractionPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Enrich one document.
    ///
    /// Fails only when extraction (native or OCR) fails; every later
    /// stage has a fallback.
    pub async fn enrich(&self, document: &Document) -> EnrichResult<EnrichmentRecord> {
        let outcome = self.pipeline.extract_with_fallback(document).await?;
        let extraction = outcome.result;

        let scrubbed = scrub_contacts(&extraction.text);
        let language = self.detector.detect(&scrubbed);
        let hint = self.detector.hint(&language);
        debug!(
            file_name = document.file_name(),
            language = %language,
            hint = %hint,
            "Language detected"
        );

        let keyword_task = {
            let keywords = Arc::clone(&self.keywords);
            let text = scrubbed.clone();
            let hint = hint.clone();
            tokio::task::spawn_blocking(move || keywords.extract(&text, &hint))
        };
        let summary = self.summarizer.summarize(&scrubbed, &hint).await;
        let keywords = keyword_task.await?;

        info!(
            file_name = document.file_name(),
            method = %extraction.method,
            chars = extraction.chars,
            summary_branch = %summary.branch,
            keywords = keywords.len(),
            "Document enriched"
        );

        Ok(EnrichmentRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            file_name: document.file_name().to_string(),
            file_type: document.file_type(),
            file_size_bytes: document.size(),
            text_extract_method: extraction.method,
            text_pages: extraction.pages,
            text_chars: extraction.chars,
            language,
            summary: summary.text,
            keywords,
            extraction_branch: outcome.branch,
            summary_branch: summary.branch,
            text: extraction.text,
        })
    }
}
