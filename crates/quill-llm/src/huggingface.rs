//! Hugging Face inference endpoint summarizer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use quill_core::config::RemoteConfig;
use quill_core::error::{EnrichError, EnrichResult};
use quill_core::traits::{RemoteReply, SummaryRequest, SummaryService};

/// Longest body excerpt kept in a failure reason.
const REASON_BODY_CHARS: usize = 200;

/// Summarizer backed by a hosted summarization model.
pub struct HfInferenceSummarizer {
    client: Client,
    endpoint: Url,
    model: String,
    token: SecretString,
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct LoadingBody {
    estimated_time: Option<f64>,
}

impl HfInferenceSummarizer {
    /// Create a client for `config.model` under `config.base_url`.
    pub fn new(config: &RemoteConfig, token: SecretString) -> EnrichResult<Self> {
        if config.model.trim().is_empty() {
            return Err(EnrichError::configuration("Remote summarization model is empty"));
        }

        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&base)
            .and_then(|base| base.join(config.model.trim()))
            .map_err(|e| EnrichError::Configuration(format!("Invalid inference URL: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                EnrichError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint,
            model: config.model.trim().to_string(),
            token,
        })
    }

    /// Create from config, taking the token from `api_token`.
    pub fn from_config(config: &RemoteConfig) -> EnrichResult<Self> {
        let token = config.api_token.clone().ok_or_else(|| {
            EnrichError::configuration(
                "Inference API token not found. Set HF_TOKEN environment variable or provide api_token in config.",
            )
        })?;
        Self::new(config, SecretString::new(token))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SummaryService for HfInferenceSummarizer {
    async fn summarize(&self, request: &SummaryRequest) -> RemoteReply {
        let payload = InferenceRequest {
            inputs: &request.input,
            parameters: InferenceParameters {
                max_length: request.max_length,
                min_length: request.min_length,
                do_sample: false,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let response = match self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.token.expose_secret())
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return RemoteReply::Failed(format!("Inference request failed: {}", e)),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return RemoteReply::Failed(format!("Failed to read response body: {}", e)),
        };
        debug!(status = status.as_u16(), bytes = body.len(), "Inference response");

        classify_response(status, &body)
    }

    fn model_name(&self) -> String {
        self.model.clone()
    }
}

/// Classify one HTTP response.
///
/// * 200 with `summary_text` (object, or first element of a list) is a summary.
/// * 200 with any other body is unusable.
/// * 503 is a cold start, with the wait estimate when the body has one.
/// * Anything else is a failure.
pub fn classify_response(status: StatusCode, body: &str) -> RemoteReply {
    match status {
        StatusCode::OK => match serde_json::from_str::<Value>(body) {
            Ok(value) => summary_text(&value)
                .map(|text| RemoteReply::Summary(text.trim().to_string()))
                .unwrap_or(RemoteReply::Unusable),
            Err(_) => RemoteReply::Unusable,
        },
        StatusCode::SERVICE_UNAVAILABLE => RemoteReply::ColdStart {
            estimated_time: serde_json::from_str::<LoadingBody>(body)
                .ok()
                .and_then(|b| b.estimated_time),
        },
        _ => {
            let excerpt: String = body.chars().take(REASON_BODY_CHARS).collect();
            RemoteReply::Failed(format!("Inference API error ({}): {}", status, excerpt))
        }
    }
}

fn summary_text(value: &Value) -> Option<&str> {
    let item = match value {
        Value::Array(items) => items.first()?,
        other => other,
    };
    item.get("summary_text")?.as_str()
}
