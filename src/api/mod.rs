pub mod health;
pub mod pages;
pub mod views;

use axum::{Router, routing::get};

use crate::infrastructure::AppState;

/// HTML routes: the input page and the OCR form target
pub fn pages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index).post(pages::index))
        .route("/submit", get(pages::index).post(pages::submit))
}

/// JSON routes, nested under `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
}
