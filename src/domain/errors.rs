//! Domain error types
//!
//! These errors describe why a conversation with the OCR service broke down.
//! An unsuccessful recognition is NOT an error: it is reported through
//! [`crate::domain::RecognitionOutcome`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    /// The request never got a usable HTTP answer (DNS, connect, timeout)
    #[error("Request to OCR service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success HTTP status
    #[error("OCR service returned HTTP {status}: {message}")]
    Service { status: u16, message: String },

    /// Submission was accepted but carried no job handle
    #[error("OCR service response is missing the Operation-Location header")]
    MissingOperationLocation,

    /// The job handle has no usable trailing path segment
    #[error("Invalid operation location '{0}'")]
    InvalidOperationLocation(String),

    /// The response body could not be decoded
    #[error("Could not decode OCR service response: {0}")]
    Decode(String),

    /// The HTTP client could not be set up
    #[error("OCR client error: {0}")]
    Client(String),
}

impl OcrError {
    /// Whether a status check that failed this way is worth repeating.
    pub fn is_transient(&self) -> bool {
        match self {
            OcrError::Transport(_) => true,
            OcrError::Service { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
