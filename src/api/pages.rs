use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use std::sync::Arc;

use super::views::{PageResult, render_page};
use crate::domain::RecognitionOutcome;
use crate::services::OcrBridge;

#[derive(Debug, Default, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Input page, served for `/` and for a bare `GET /submit`
pub async fn index() -> Html<String> {
    Html(render_page("", &PageResult::Nothing))
}

/// Run OCR on the submitted image URL and render the outcome
pub async fn submit(
    State(ocr): State<Arc<OcrBridge>>,
    Form(form): Form<SubmitForm>,
) -> impl IntoResponse {
    let image_url = form.image_url.unwrap_or_default().trim().to_string();

    if image_url.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Html(render_page("", &PageResult::MissingUrl)),
        );
    }

    let (status, result) = match ocr.extract_text(&image_url).await {
        Ok(outcome) => {
            let status = match &outcome {
                RecognitionOutcome::Text(_) | RecognitionOutcome::Empty => StatusCode::OK,
                RecognitionOutcome::Failed(_) => StatusCode::UNPROCESSABLE_ENTITY,
                RecognitionOutcome::TimedOut { .. } => StatusCode::GATEWAY_TIMEOUT,
            };
            (status, PageResult::Recognized(outcome))
        }
        Err(e) => {
            tracing::error!("OCR request for {} failed: {}", image_url, e);
            (StatusCode::BAD_GATEWAY, PageResult::ServiceError)
        }
    };

    (status, Html(render_page(&image_url, &result)))
}
