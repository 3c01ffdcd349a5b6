use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use readlens::azure_read::AzureReadClient;
use readlens::infrastructure::AppState;
use readlens::server::build_router;
use readlens::services::PollPolicy;
use secrecy::SecretString;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot`
use url::Url;
use wiremock::matchers::{body_json, header as header_eq, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS_PATH: &str = "/vision/v3.2/read/analyzeResults/abc123";

// Helper to create an app talking to the mock OCR service
fn setup_app(mock_server: &MockServer, max_attempts: u32) -> Router {
    let endpoint = Url::parse(&format!("{}/", mock_server.uri())).unwrap();
    let client = AzureReadClient::new(
        endpoint,
        SecretString::new("test-key".to_string()),
        Duration::from_secs(5),
    )
    .expect("Failed to build client");

    let policy = PollPolicy {
        interval: Duration::from_millis(10),
        max_attempts,
        retries: 1,
    };
    build_router(AppState::new(Arc::new(client), policy))
}

// Helper to mount an accepted submission for the given image
async fn mount_submission(mock_server: &MockServer, image_url: &str) {
    Mock::given(method("POST"))
        .and(path("/vision/v3.2/read/analyze"))
        .and(query_param("language", "en"))
        .and(header_eq("Ocp-Apim-Subscription-Key", "test-key"))
        .and(body_json(json!({ "url": image_url })))
        .respond_with(ResponseTemplate::new(202).insert_header(
            "Operation-Location",
            format!("{}{}", mock_server.uri(), RESULTS_PATH).as_str(),
        ))
        .expect(1)
        .mount(mock_server)
        .await;
}

fn submit_request(form_body: &str) -> Request<Body> {
    Request::builder()
        .uri("/submit")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form_body.to_string()))
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_submit_polls_until_succeeded() {
    let mock_server = MockServer::start().await;
    mount_submission(&mock_server, "https://example.com/a.png").await;

    // First poll: still running
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "running" })))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    // Second poll: done, one block of two lines
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "succeeded",
            "analyzeResult": {
                "version": "3.2.0",
                "readResults": [
                    { "page": 1, "lines": [ { "text": "line1" }, { "text": "line2" } ] }
                ]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = setup_app(&mock_server, 10);
    let response = app
        .oneshot(submit_request("image_url=https%3A%2F%2Fexample.com%2Fa.png"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"<p id="prediction"> line1 line2</p>"#));
    assert!(html.contains(r#"name="image_url" value="https://example.com/a.png""#));
    assert!(html.contains(r#"id="img_path" src="https://example.com/a.png""#));
}

#[tokio::test]
async fn test_get_index_renders_without_result() {
    let mock_server = MockServer::start().await;
    let app = setup_app(&mock_server, 10);

    let req = Request::builder()
        .uri("/")
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains(r#"<form action="/submit" method="post">"#));
    assert!(!html.contains("id=\"prediction\""));
}

#[tokio::test]
async fn test_post_index_and_get_submit_ignore_input() {
    let mock_server = MockServer::start().await;
    let app = setup_app(&mock_server, 10);

    let req = Request::builder()
        .uri("/")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("image_url=https%3A%2F%2Fexample.com%2Fa.png"))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!body_text(response).await.contains("id=\"prediction\""));

    let req = Request::builder()
        .uri("/submit")
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!body_text(response).await.contains("id=\"prediction\""));

    // No request may reach the OCR service
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_without_url_is_rejected_locally() {
    let mock_server = MockServer::start().await;
    let app = setup_app(&mock_server, 10);

    let response = app.clone().oneshot(submit_request("image_url=++")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Please enter the URL of an image."));

    let response = app.oneshot(submit_request("")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_recognition_is_reported() {
    let mock_server = MockServer::start().await;
    mount_submission(&mock_server, "https://example.com/broken.png").await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "failed" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = setup_app(&mock_server, 10);
    let response = app
        .oneshot(submit_request(
            "image_url=https%3A%2F%2Fexample.com%2Fbroken.png",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("Recognition failed (status: failed)"));
    assert!(!html.contains("id=\"prediction\""));
}

#[tokio::test]
async fn test_empty_recognition_shows_notice() {
    let mock_server = MockServer::start().await;
    mount_submission(&mock_server, "https://example.com/blank.png").await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "succeeded",
            "analyzeResult": { "readResults": [ { "page": 1, "lines": [] } ] }
        })))
        .mount(&mock_server)
        .await;

    let app = setup_app(&mock_server, 10);
    let response = app
        .oneshot(submit_request(
            "image_url=https%3A%2F%2Fexample.com%2Fblank.png",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"<p id="prediction"></p>"#));
    assert!(html.contains("No text was found in this image."));
}

#[tokio::test]
async fn test_never_finishing_job_times_out() {
    let mock_server = MockServer::start().await;
    mount_submission(&mock_server, "https://example.com/slow.png").await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "notStarted" })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let app = setup_app(&mock_server, 3);
    let response = app
        .oneshot(submit_request(
            "image_url=https%3A%2F%2Fexample.com%2Fslow.png",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    assert!(
        body_text(response)
            .await
            .contains("Recognition did not finish after 3 status checks.")
    );
}

#[tokio::test]
async fn test_rejected_submission_renders_service_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/vision/v3.2/read/analyze"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": "InvalidImageUrl", "message": "Image URL is badly formatted." }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = setup_app(&mock_server, 10);
    let response = app
        .oneshot(submit_request("image_url=not-a-url"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let html = body_text(response).await;
    assert!(html.contains("The OCR service could not process this request."));
    assert!(html.contains(r#"value="not-a-url""#));
}

#[tokio::test]
async fn test_health_check() {
    let mock_server = MockServer::start().await;
    let app = setup_app(&mock_server, 10);

    let req = Request::builder()
        .uri("/api/health")
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let data: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(data["status"], "ok");
    assert_eq!(data["service"], "readlens");
}
