//! Bounded, immediate-retry attempt loop over a [`Transport`].
//!
//! - Attempts run sequentially with no delay between them.
//! - `Terminal` outcomes stop the loop on first occurrence.
//! - The timeout applies to each attempt, not to the whole loop.

use crate::config::ToolConfig;
use crate::error::ToolError;
use crate::transport::{AttemptOutcome, HttpMethod, Transport, TransportRequest};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// How one attempt ended, as reported to an [`AttemptSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptStatus {
    Succeeded,
    Retryable(String),
    Terminal(String),
}

impl From<&AttemptOutcome> for AttemptStatus {
    fn from(outcome: &AttemptOutcome) -> Self {
        match outcome {
            AttemptOutcome::Ok(_) => AttemptStatus::Succeeded,
            AttemptOutcome::Retryable(err) => AttemptStatus::Retryable(err.to_string()),
            AttemptOutcome::Terminal(err) => AttemptStatus::Terminal(err.to_string()),
        }
    }
}

/// Diagnostic record emitted once per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptEvent {
    /// 1-based.
    pub attempt: u32,
    pub max_attempts: u32,
    pub method: HttpMethod,
    pub url: String,
    pub timeout: Duration,
    pub status: AttemptStatus,
}

/// Receives attempt diagnostics. Observability only; a sink cannot change
/// what the retry loop does.
pub trait AttemptSink: Send + Sync {
    fn record(&self, event: &AttemptEvent);
}

/// Default sink: forwards every attempt to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AttemptSink for TracingSink {
    fn record(&self, event: &AttemptEvent) {
        match &event.status {
            AttemptStatus::Succeeded => debug!(
                "Attempt {}/{} {} {} (timeout {}ms) succeeded",
                event.attempt,
                event.max_attempts,
                event.method,
                event.url,
                event.timeout.as_millis()
            ),
            AttemptStatus::Retryable(reason) => warn!(
                "Attempt {}/{} {} {} (timeout {}ms) failed: {}",
                event.attempt,
                event.max_attempts,
                event.method,
                event.url,
                event.timeout.as_millis(),
                reason
            ),
            AttemptStatus::Terminal(reason) => warn!(
                "Attempt {}/{} {} {} (timeout {}ms) failed terminally: {}",
                event.attempt,
                event.max_attempts,
                event.method,
                event.url,
                event.timeout.as_millis(),
                reason
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RetryPolicy {
    /// `max_retries` is the total number of attempts and must be at least 1.
    pub fn new(max_retries: u32, timeout: Duration) -> Result<Self, ToolError> {
        if max_retries == 0 {
            return Err(ToolError::Configuration(
                "max_retries must be at least 1".to_string(),
            ));
        }
        if timeout.is_zero() {
            return Err(ToolError::Configuration(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            max_retries,
            timeout,
        })
    }

    pub fn from_config(config: &ToolConfig) -> Result<Self, ToolError> {
        Self::new(config.max_retries, config.timeout())
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the attempt loop. The request's timeout is replaced by the
    /// policy's per-attempt timeout.
    pub async fn execute(
        &self,
        transport: &dyn Transport,
        sink: &dyn AttemptSink,
        request: TransportRequest,
    ) -> Result<Value, ToolError> {
        let request = request.with_timeout(self.timeout);
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            debug!(
                "Sending {} {} (attempt {}/{})",
                request.method, request.url, attempt, self.max_retries
            );

            let outcome = transport.send(&request).await;
            sink.record(&AttemptEvent {
                attempt,
                max_attempts: self.max_retries,
                method: request.method,
                url: request.url.clone(),
                timeout: self.timeout,
                status: AttemptStatus::from(&outcome),
            });

            match outcome {
                AttemptOutcome::Ok(payload) => return Ok(payload),
                AttemptOutcome::Terminal(err) => return Err(err),
                AttemptOutcome::Retryable(err) => last_error = Some(err),
            }
        }

        warn!(
            "All {} attempts failed for {} {}",
            self.max_retries, request.method, request.url
        );
        Err(ToolError::RetriesExhausted {
            attempts: self.max_retries,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Unknown error".to_string()),
        })
    }
}
