//! Services Layer
//!
//! This module contains pure business logic kept out of HTTP handlers.
//! Services only depend on domain ports, never on a concrete provider.

pub mod ocr_service;

// Re-export for convenience
pub use ocr_service::{LANGUAGE, OcrBridge, PollPolicy, operation_id_from_location};
