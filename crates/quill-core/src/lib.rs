//! quill-core - Core library for quill.
//!
//! Turns an uploaded document into an enrichment record: extracted text,
//! detected language, a short summary and a ranked keyword list.
//!
//! # Example
//!
//! ```ignore
//! use quill_core::{EnrichConfig, Enricher};
//! use quill_extractors::Document;
//!
//! let config = EnrichConfig::from_env();
//! let enricher = Enricher::from_config(&config, None)?;
//!
//! let record = enricher.enrich(&Document::from_path("report.pdf")?).await?;
//! println!("{} [{}]: {}", record.file_name, record.language, record.summary);
//! ```

pub mod config;
pub mod enrich;
pub mod error;
pub mod keywords;
pub mod language;
pub mod scrub;
pub mod summarize;
pub mod traits;

// Re-export commonly used types
pub use config::{EnrichConfig, EnrichConfigBuilder, RemoteConfig};
pub use enrich::{Enricher, EnrichmentRecord};
pub use error::{EnrichError, EnrichResult, ErrorCode};
pub use keywords::{KeywordConfig, KeywordExtractor, StopWords, ZipfLexicon};
pub use language::{LanguageConfig, LanguageDetector, UNKNOWN_LANGUAGE};
pub use scrub::scrub_contacts;
pub use summarize::{
    RetryPolicy, RetryState, SummaryBranch, SummaryConfig, SummaryOutcome, Summarizer,
};
pub use traits::{RemoteReply, SummaryRequest, SummaryService};
