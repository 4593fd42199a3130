//! quill-llm - Remote summarization clients for quill.
//!
//! Implements [`quill_core::SummaryService`] on top of hosted inference
//! endpoints. Each call is a single attempt; retry and fallback live in
//! `quill_core::summarize`.
//!
//! # Example
//!
//! ```ignore
//! use quill_llm::SummarizerFactory;
//!
//! let config = quill_core::EnrichConfig::from_env();
//! // None when HF_TOKEN is unset or remote summaries are disabled
//! let service = SummarizerFactory::from_config(&config)?;
//! let enricher = quill_core::Enricher::from_config(&config, service)?;
//! ```

mod factory;
mod huggingface;

pub use factory::SummarizerFactory;
pub use huggingface::{classify_response, HfInferenceSummarizer};

// Re-export core types for convenience
pub use quill_core::traits::{RemoteReply, SummaryRequest, SummaryService};
