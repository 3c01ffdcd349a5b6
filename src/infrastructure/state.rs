//! Application state containing the OCR bridge

use std::sync::Arc;

use crate::domain::{OcrError, ReadService};
use crate::infrastructure::Config;
use crate::modules::integrations::AzureReadClient;
use crate::services::{OcrBridge, PollPolicy};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Bridge to the OCR provider, built once at startup
    pub ocr: Arc<OcrBridge>,
}

impl AppState {
    /// Create an AppState around any read service (used by tests with fakes)
    pub fn new(service: Arc<dyn ReadService>, policy: PollPolicy) -> Self {
        Self {
            ocr: Arc::new(OcrBridge::new(service, policy)),
        }
    }

    /// Create an AppState talking to the configured Azure endpoint
    pub fn from_config(config: &Config) -> Result<Self, OcrError> {
        let client = AzureReadClient::new(
            config.endpoint.clone(),
            config.key.clone(),
            config.http_timeout,
        )?;

        Ok(Self::new(Arc::new(client), config.poll))
    }
}

// Allow handlers to extract the bridge directly
impl axum::extract::FromRef<AppState> for Arc<OcrBridge> {
    fn from_ref(state: &AppState) -> Self {
        state.ocr.clone()
    }
}
