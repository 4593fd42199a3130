//! Two-tier summarization: remote inference for long English text,
//! extractive local summary otherwise and as the universal fallback.

mod local;
mod retry;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::traits::{SummaryRequest, SummaryService};

pub use local::{local_summary, split_sentences};
pub use retry::{run_with_retry, RetryPolicy, RetryState};

/// Summarization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Minimum scrubbed length (chars) before the remote path is tried.
    pub remote_min_chars: usize,
    /// Language hint that qualifies for the remote path.
    pub remote_language: String,
    /// Input sent to the remote service is cut to this many chars.
    pub max_input_chars: usize,
    /// Remote generation upper bound.
    pub max_length: u32,
    /// Remote generation lower bound.
    pub min_length: u32,
    /// Local summary character budget, ellipsis excluded.
    pub local_max_chars: usize,
    /// Leading sentences kept by the local summary.
    pub local_sentences: usize,
    /// Local summary of empty text.
    pub placeholder: String,
    /// Appended when the local summary is cut.
    pub ellipsis: String,
    /// Master switch for the remote path.
    pub enable_remote: bool,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            remote_min_chars: 300,
            remote_language: "en".to_string(),
            max_input_chars: 12_000,
            max_length: 160,
            min_length: 40,
            local_max_chars: 900,
            local_sentences: 3,
            placeholder: "—".to_string(),
            ellipsis: "…".to_string(),
            enable_remote: true,
        }
    }
}

/// Which branch produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SummaryBranch {
    /// Remote service returned a usable summary.
    Remote,
    /// Remote path not eligible; local summary used directly.
    Local,
    /// Remote path tried and exhausted; local summary used.
    RemoteFallback,
}

/// A summary tagged with the branch that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryOutcome {
    pub text: String,
    pub branch: SummaryBranch,
}

/// Summarizer with an optional remote backend.
pub struct Summarizer {
    config: SummaryConfig,
    policy: RetryPolicy,
    service: Option<Arc<dyn SummaryService>>,
}

impl Summarizer {
    /// Local-only summarizer.
    pub fn new(config: SummaryConfig, policy: RetryPolicy) -> Self {
        Self {
            config,
            policy,
            service: None,
        }
    }

    /// Attach a remote backend.
    pub fn with_service(mut self, service: Arc<dyn SummaryService>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Whether `text` with `hint` qualifies for the remote path.
    pub fn wants_remote(&self, text: &str, hint: &str) -> bool {
        self.config.enable_remote
            && self.service.is_some()
            && hint == self.config.remote_language
            && text.chars().count() >= self.config.remote_min_chars
    }

    /// Summarize scrubbed text. Never fails.
    pub async fn summarize(&self, text: &str, hint: &str) -> SummaryOutcome {
        let service = match &self.service {
            Some(service) if self.wants_remote(text, hint) => service,
            _ => {
                debug!(hint, "Using local summary");
                return SummaryOutcome {
                    text: self.local(text),
                    branch: SummaryBranch::Local,
                };
            }
        };

        let request = SummaryRequest::new(
            text,
            self.config.max_input_chars,
            self.config.max_length,
            self.config.min_length,
        );

        match run_with_retry(&self.policy, service.as_ref(), &request).await {
            Some(summary) => SummaryOutcome {
                text: summary,
                branch: SummaryBranch::Remote,
            },
            None => {
                info!(model = %service.model_name(), "Remote summary unavailable, falling back to local summary");
                SummaryOutcome {
                    text: self.local(text),
                    branch: SummaryBranch::RemoteFallback,
                }
            }
        }
    }

    /// The local extractive summary.
    pub fn local(&self, text: &str) -> String {
        local_summary(text, &self.config)
    }
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new(SummaryConfig::default(), RetryPolicy::default())
    }
}
