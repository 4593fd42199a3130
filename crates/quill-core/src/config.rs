//! Configuration system for quill.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use quill_extractors::{ExtractionSettings, OcrSettings};

use crate::error::{EnrichError, EnrichResult};
use crate::keywords::KeywordConfig;
use crate::language::LanguageConfig;
use crate::summarize::{RetryPolicy, SummaryConfig};

/// Remote summarization endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Model identifier appended to the base URL.
    pub model: String,
    /// Base URL of the inference service.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// API token (if not using environment variable).
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            model: "facebook/bart-large-cnn".to_string(),
            base_url: "https://router.huggingface.co/hf-inference/models".to_string(),
            timeout_secs: 180,
            api_token: None,
        }
    }
}

/// Main enrichment configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    /// Native extraction options.
    pub extraction: ExtractionSettings,
    /// OCR escalation.
    pub ocr: OcrSettings,
    /// Language detection.
    pub language: LanguageConfig,
    /// Summarization (local and remote decision).
    pub summary: SummaryConfig,
    /// Remote call retry/backoff.
    pub retry: RetryPolicy,
    /// Keyword extraction.
    pub keywords: KeywordConfig,
    /// Remote summarization endpoint.
    pub remote: RemoteConfig,
}

impl EnrichConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> EnrichResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| EnrichError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| EnrichError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| EnrichError::Configuration(e.to_string())),
            _ => Err(EnrichError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from environment variables.
    pub fn apply_env(&mut self) {
        if let Some(token) = env_var("HF_TOKEN") {
            self.remote.api_token = Some(token);
        }
        if let Some(model) = env_var("QUILL_HF_MODEL") {
            self.remote.model = model;
        }

        if let Some(threshold) = env_parse("QUILL_OCR_THRESHOLD") {
            self.ocr.threshold_chars = threshold;
        }
        if let Some(max_pages) = env_parse("QUILL_OCR_MAX_PAGES") {
            self.ocr.max_pages = max_pages;
        }
        if let Some(dpi) = env_parse("QUILL_OCR_DPI") {
            self.ocr.dpi = dpi;
        }
        if let Some(languages) = env_var("QUILL_OCR_LANGUAGES") {
            self.ocr.languages = languages;
        }

        if let Some(include_tables) = env_parse("QUILL_DOCX_TABLES") {
            self.extraction.include_tables = include_tables;
        }

        if env_var("QUILL_DISABLE_REMOTE").is_some() {
            self.summary.enable_remote = false;
        }
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> EnrichConfigBuilder {
        EnrichConfigBuilder::default()
    }

    /// Whether a remote summarizer should be constructed at all.
    pub fn remote_enabled(&self) -> bool {
        self.summary.enable_remote && self.remote.api_token.is_some()
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let value = env_var(key)?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(key, value = %value, "Ignoring unparsable environment override");
            None
        }
    }
}

/// Builder for EnrichConfig.
#[derive(Default)]
pub struct EnrichConfigBuilder {
    config: EnrichConfig,
}

impl EnrichConfigBuilder {
    /// Include structured-document table text.
    pub fn include_tables(mut self, include: bool) -> Self {
        self.config.extraction.include_tables = include;
        self
    }

    /// Set OCR escalation settings.
    pub fn ocr(mut self, settings: OcrSettings) -> Self {
        self.config.ocr = settings;
        self
    }

    /// Set language detection configuration.
    pub fn language(mut self, config: LanguageConfig) -> Self {
        self.config.language = config;
        self
    }

    /// Set summarization configuration.
    pub fn summary(mut self, config: SummaryConfig) -> Self {
        self.config.summary = config;
        self
    }

    /// Set remote retry policy.
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Set keyword extraction configuration.
    pub fn keywords(mut self, config: KeywordConfig) -> Self {
        self.config.keywords = config;
        self
    }

    /// Set remote endpoint configuration.
    pub fn remote(mut self, config: RemoteConfig) -> Self {
        self.config.remote = config;
        self
    }

    /// Point keyword extraction at a full word frequency list.
    pub fn lexicon_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.keywords.lexicon_path = Some(path.into());
        self
    }

    /// Never call the remote summarizer.
    pub fn disable_remote(mut self) -> Self {
        self.config.summary.enable_remote = false;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> EnrichConfig {
        self.config
    }
}
