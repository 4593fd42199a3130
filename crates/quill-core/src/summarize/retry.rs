//! Bounded retry for the remote summarizer, as an explicit state machine.
//!
//! ```text
//! Attempting(n) --Summary--------------------------> Succeeded
//!               --Unusable-------------------------> FallenBack
//!               --any failure, n == max_attempts---> FallenBack
//!               --ColdStart(estimate)--------------> ColdStartWait --> Attempting(n+1)
//!               --ColdStart(none) | Failed---------> Backoff ------> Attempting(n+1)
//! ```
//!
//! Every call counts as an attempt. A cold start with an estimate waits
//! `estimate + padding` instead of the linear backoff.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::traits::{RemoteReply, SummaryRequest, SummaryService};

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total calls allowed, first attempt included.
    pub max_attempts: u32,
    /// Linear backoff step: attempt `n` is followed by `n * step` seconds.
    pub backoff_step_secs: f64,
    /// Added to the service's cold start estimate.
    pub cold_start_padding_secs: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            backoff_step_secs: 1.5,
            cold_start_padding_secs: 1.0,
        }
    }
}

/// States of the remote summarization loop.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryState {
    /// About to make call number `n` (1-based).
    Attempting(u32),
    /// Model loading; wait for the estimate, then attempt again.
    ColdStartWait { next_attempt: u32, wait: Duration },
    /// Transient failure; linear backoff, then attempt again.
    Backoff { next_attempt: u32, delay: Duration },
    /// Terminal: usable summary.
    Succeeded(String),
    /// Terminal: give up, use the local summary.
    FallenBack,
}

impl RetryPolicy {
    /// Delay after failed attempt `attempt`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        secs(self.backoff_step_secs * attempt as f64).unwrap_or_default()
    }

    /// Next state after attempt `attempt` produced `reply`.
    pub fn transition(&self, attempt: u32, reply: RemoteReply) -> RetryState {
        match reply {
            RemoteReply::Summary(text) => {
                let text = text.trim();
                if text.is_empty() {
                    RetryState::FallenBack
                } else {
                    RetryState::Succeeded(text.to_string())
                }
            }
            RemoteReply::Unusable => RetryState::FallenBack,
            _ if attempt >= self.max_attempts => RetryState::FallenBack,
            RemoteReply::ColdStart {
                estimated_time: Some(estimate),
            } => match secs(estimate + self.cold_start_padding_secs) {
                Some(wait) => RetryState::ColdStartWait {
                    next_attempt: attempt + 1,
                    wait,
                },
                None => self.backoff(attempt),
            },
            RemoteReply::ColdStart {
                estimated_time: None,
            }
            | RemoteReply::Failed(_) => self.backoff(attempt),
        }
    }

    fn backoff(&self, attempt: u32) -> RetryState {
        RetryState::Backoff {
            next_attempt: attempt + 1,
            delay: self.backoff_delay(attempt),
        }
    }
}

fn secs(value: f64) -> Option<Duration> {
    if value.is_finite() && value >= 0.0 {
        Duration::try_from_secs_f64(value).ok()
    } else {
        None
    }
}

/// Drive the state machine against `service`.
///
/// Returns the summary on success, `None` when the caller should fall
/// back. Waits are sequential; nothing is retried in parallel.
pub async fn run_with_retry(
    policy: &RetryPolicy,
    service: &dyn SummaryService,
    request: &SummaryRequest,
) -> Option<String> {
    if policy.max_attempts == 0 {
        return None;
    }

    let mut state = RetryState::Attempting(1);
    loop {
        state = match state {
            RetryState::Attempting(attempt) => {
                let reply = service.summarize(request).await;
                match &reply {
                    RemoteReply::Summary(_) => {
                        debug!(attempt, model = %service.model_name(), "Remote summary received")
                    }
                    RemoteReply::Unusable => {
                        warn!(attempt, "Remote summarizer returned no summary field")
                    }
                    RemoteReply::ColdStart { estimated_time } => {
                        warn!(attempt, ?estimated_time, "Remote model is loading")
                    }
                    RemoteReply::Failed(reason) => {
                        warn!(attempt, %reason, "Remote summarization attempt failed")
                    }
                }
                policy.transition(attempt, reply)
            }
            RetryState::ColdStartWait { next_attempt, wait } => {
                debug!(?wait, next_attempt, "Waiting for remote model to load");
                tokio::time::sleep(wait).await;
                RetryState::Attempting(next_attempt)
            }
            RetryState::Backoff {
                next_attempt,
                delay,
            } => {
                debug!(?delay, next_attempt, "Backing off before next attempt");
                tokio::time::sleep(delay).await;
                RetryState::Attempting(next_attempt)
            }
            RetryState::Succeeded(summary) => return Some(summary),
            RetryState::FallenBack => return None,
        };
    }
}
