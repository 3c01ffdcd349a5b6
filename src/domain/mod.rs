//! Domain layer - Pure OCR abstractions
//!
//! This layer contains NO framework dependencies (no Axum, no reqwest types
//! in the public surface beyond error sources).
//! Only the read service port, recognition types and domain error types.

pub mod errors;
pub mod ports;
pub mod recognition;

pub use errors::OcrError;
pub use ports::ReadService;
pub use recognition::*;
