//! Read service trait definition
//!
//! This trait defines the contract with the remote recognition provider.
//! Implementations live in the integrations module.

use async_trait::async_trait;

use super::{OcrError, ReadOperation};

/// Submit/poll protocol of an asynchronous OCR provider
#[async_trait]
pub trait ReadService: Send + Sync {
    /// Submit an image URL for recognition.
    ///
    /// Returns the raw operation location (a URL whose last path segment is
    /// the operation id).
    async fn submit(&self, image_url: &str, language: &str) -> Result<String, OcrError>;

    /// Fetch the current state of a submitted operation
    async fn fetch_result(&self, operation_id: &str) -> Result<ReadOperation, OcrError>;
}
