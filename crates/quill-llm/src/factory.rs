//! Factory for creating remote summarization services.

use std::sync::Arc;

use quill_core::config::EnrichConfig;
use quill_core::error::EnrichResult;
use quill_core::traits::SummaryService;
use tracing::info;

use crate::huggingface::HfInferenceSummarizer;

/// Factory for creating remote summarizers.
pub struct SummarizerFactory;

impl SummarizerFactory {
    /// Build the remote summarizer described by `config`.
    ///
    /// Returns `None` when the remote path is switched off or no API
    /// token is configured; the pipeline then always summarizes locally.
    pub fn from_config(config: &EnrichConfig) -> EnrichResult<Option<Arc<dyn SummaryService>>> {
        if !config.remote_enabled() {
            info!(
                enabled = config.summary.enable_remote,
                "Remote summarization disabled, using local summaries"
            );
            return Ok(None);
        }

        let summarizer = HfInferenceSummarizer::from_config(&config.remote)?;
        info!(model = %summarizer.model_name(), "Remote summarization enabled");
        Ok(Some(Arc::new(summarizer)))
    }

    /// Create a summarizer for a specific model.
    pub fn huggingface(
        model: impl Into<String>,
        token: impl Into<String>,
    ) -> EnrichResult<Arc<dyn SummaryService>> {
        let mut config = EnrichConfig::default().remote;
        config.model = model.into();
        config.api_token = Some(token.into());
        Ok(Arc::new(HfInferenceSummarizer::from_config(&config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::config::RemoteConfig;

    #[test]
    fn test_no_token_means_no_service() {
        let config = EnrichConfig::default();
        assert!(SummarizerFactory::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_disabled_remote_means_no_service() {
        let config = EnrichConfig::builder()
            .remote(RemoteConfig {
                api_token: Some("hf_test".to_string()),
                ..Default::default()
            })
            .disable_remote()
            .build();
        assert!(SummarizerFactory::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_token_builds_service() {
        let config = EnrichConfig::builder()
            .remote(RemoteConfig {
                api_token: Some("hf_test".to_string()),
                ..Default::default()
            })
            .build();
        let service = SummarizerFactory::from_config(&config).unwrap().unwrap();
        assert_eq!(service.model_name(), "facebook/bart-large-cnn");
    }

    #[test]
    fn test_huggingface_with_model() {
        let service = SummarizerFactory::huggingface("sshleifer/distilbart-cnn-12-6", "hf_test").unwrap();
        assert_eq!(service.model_name(), "sshleifer/distilbart-cnn-12-6");
    }
}
