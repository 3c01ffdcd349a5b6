//! OCR Service - drives the submit/poll/fetch protocol to a single outcome
//!
//! This module contains the only real logic of the application. It knows
//! nothing about HTTP handlers and can be called from anywhere that owns a
//! [`ReadService`].

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::domain::{OcrError, ReadOperation, ReadService, RecognitionOutcome};

/// Language hint sent with every submission
pub const LANGUAGE: &str = "en";

/// How the bridge waits for a job to finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Fixed pause between two status checks
    pub interval: Duration,
    /// Maximum number of status checks before giving up
    pub max_attempts: u32,
    /// Extra tries for a status check that failed transiently
    pub retries: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 30,
            retries: 2,
        }
    }
}

/// Turns an image URL into a [`RecognitionOutcome`]
pub struct OcrBridge {
    service: Arc<dyn ReadService>,
    policy: PollPolicy,
}

impl OcrBridge {
    pub fn new(service: Arc<dyn ReadService>, policy: PollPolicy) -> Self {
        Self { service, policy }
    }

    /// Submit the image, wait for a terminal status and collect the text.
    pub async fn extract_text(&self, image_url: &str) -> Result<RecognitionOutcome, OcrError> {
        let location = self.service.submit(image_url, LANGUAGE).await?;
        let operation_id = operation_id_from_location(&location)?;
        tracing::info!("OCR job {} submitted for {}", operation_id, image_url);

        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        let operation = loop {
            attempt += 1;
            let operation = self.check_status(&operation_id).await?;

            if !operation.status.is_pending() {
                break operation;
            }

            if attempt >= max_attempts {
                tracing::warn!(
                    "OCR job {} still {} after {} status checks, giving up",
                    operation_id,
                    operation.status,
                    attempt
                );
                return Ok(RecognitionOutcome::TimedOut { attempts: attempt });
            }

            tracing::debug!(
                "OCR job {} is {} (check {}/{})",
                operation_id,
                operation.status,
                attempt,
                max_attempts
            );
            tokio::time::sleep(self.policy.interval).await;
        };

        let outcome = RecognitionOutcome::from_terminal(&operation);
        match &outcome {
            RecognitionOutcome::Failed(status) => {
                tracing::warn!("OCR job {} ended with status {}", operation_id, status)
            }
            _ => tracing::info!(
                "OCR job {} succeeded after {} status checks",
                operation_id,
                attempt
            ),
        }

        Ok(outcome)
    }

    /// Same as [`Self::extract_text`], flattened to the historical string
    /// contract: an unsuccessful job yields an empty string.
    pub async fn extract_text_legacy(&self, image_url: &str) -> Result<String, OcrError> {
        let outcome = self.extract_text(image_url).await?;
        Ok(outcome.legacy_text().to_string())
    }

    /// One status check, retried on transient failures
    async fn check_status(&self, operation_id: &str) -> Result<ReadOperation, OcrError> {
        let mut failures = 0;
        loop {
            match self.service.fetch_result(operation_id).await {
                Ok(operation) => return Ok(operation),
                Err(e) if e.is_transient() && failures < self.policy.retries => {
                    failures += 1;
                    tracing::warn!(
                        "Status check for OCR job {} failed ({}), retry {}/{}",
                        operation_id,
                        e,
                        failures,
                        self.policy.retries
                    );
                    tokio::time::sleep(self.policy.interval).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Extract the operation id: the trailing path segment of the location URL.
pub fn operation_id_from_location(location: &str) -> Result<String, OcrError> {
    let url = Url::parse(location.trim())
        .map_err(|_| OcrError::InvalidOperationLocation(location.to_string()))?;

    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| OcrError::InvalidOperationLocation(location.to_string()))
}
