//! Remote summarization service trait and related types.

use async_trait::async_trait;
use serde::Serialize;

/// A single summarization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRequest {
    /// Input text, already cut to the service's input budget.
    pub input: String,
    /// Upper bound on generated length.
    pub max_length: u32,
    /// Lower bound on generated length.
    pub min_length: u32,
}

impl SummaryRequest {
    /// Build a request, keeping at most `max_input_chars` characters of `text`.
    pub fn new(text: &str, max_input_chars: usize, max_length: u32, min_length: u32) -> Self {
        Self {
            input: text.chars().take(max_input_chars).collect(),
            max_length,
            min_length,
        }
    }
}

/// Classified outcome of one call to a remote summarizer.
///
/// Transport errors are folded into [`RemoteReply::Failed`]; the caller
/// only decides between retrying and falling back.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteReply {
    /// Success with a summary text.
    Summary(String),
    /// Success, but the body carried no summary.
    Unusable,
    /// The model is still loading. May carry the service's wait estimate
    /// in seconds.
    ColdStart { estimated_time: Option<f64> },
    /// Any other status or a transport failure.
    Failed(String),
}

/// Core SummaryService trait - remote summarization backends implement this.
///
/// Deterministic generation is expected; the service is asked to wait
/// for a cold model rather than fail immediately.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SummaryService: Send + Sync {
    /// Perform one summarization attempt. Never retries internally.
    async fn summarize(&self, request: &SummaryRequest) -> RemoteReply;

    /// Get the model name.
    fn model_name(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_truncates_by_characters() {
        let text = "ж".repeat(20);
        let request = SummaryRequest::new(&text, 12, 160, 40);
        assert_eq!(request.input.chars().count(), 12);
        assert_eq!(request.max_length, 160);
        assert_eq!(request.min_length, 40);

        let request = SummaryRequest::new("short", 12_000, 160, 40);
        assert_eq!(request.input, "short");
    }
}
