//! HTTP surface tests driven through `tower::ServiceExt::oneshot`.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::{PanickingClient, StubClient};
use quotegen::client::GenerationClient;
use quotegen::server::{router, REQUEST_ID_HEADER};
use quotegen::QuoteService;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

fn app(client: Arc<dyn GenerationClient>) -> Router {
    router(Arc::new(QuoteService::new(common::config(), client)))
}

fn post_api(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value, Option<String>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body, request_id)
}

#[tokio::test]
async fn test_health_reports_cache() {
    let app = app(Arc::new(StubClient::valid(1)));
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body, request_id) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["cache"]["backend"], "memory");
    assert_eq!(body["cache"]["entries"], 0);
    assert!(Uuid::parse_str(&request_id.unwrap()).is_ok());
}

#[tokio::test]
async fn test_generate_success() {
    let client = Arc::new(StubClient::valid(2));
    let app = app(client.clone());

    let payload = json!({ "quoteCount": 2, "apiKey": "sk-test", "language": "en" });
    let (status, body, request_id) = send(&app, post_api(payload.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let quotes = body["quotes"].as_array().unwrap();
    assert_eq!(quotes.len(), 2);
    assert!(quotes[0]["author"].is_string());
    assert!(quotes[0]["quote"].is_string());
    assert!(request_id.is_some());
}

#[tokio::test]
async fn test_second_identical_request_hits_cache() {
    let client = Arc::new(StubClient::valid(2));
    let app = app(client.clone());
    let payload = json!({ "quoteCount": 2, "apiKey": "sk-test", "language": "es" }).to_string();

    let (first_status, first, first_id) = send(&app, post_api(payload.clone())).await;
    let (second_status, second, second_id) = send(&app, post_api(payload)).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
    assert_ne!(first_id, second_id);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_missing_api_key_is_400_without_generation() {
    let client = Arc::new(StubClient::valid(2));
    let app = app(client.clone());

    let payload = json!({ "quoteCount": 2, "language": "en" });
    let (status, body, _) = send(&app, post_api(payload.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["error"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["field"], "apiKey");
    assert_eq!(errors[0]["message"], "API Key is required");
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_invalid_fields_are_all_listed() {
    let client = Arc::new(StubClient::valid(2));
    let app = app(client.clone());

    let payload = json!({ "quoteCount": 20, "apiKey": "", "language": "fr" });
    let (status, body, _) = send(&app, post_api(payload.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["error"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert!(fields.contains(&"quoteCount"));
    assert!(fields.contains(&"apiKey"));
    assert!(fields.contains(&"language"));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let client = Arc::new(StubClient::valid(2));
    let app = app(client.clone());

    let (status, body, request_id) = send(&app, post_api("{\"quoteCount\": 2,")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body.");
    assert!(request_id.is_some());
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_exhausted_generation_is_localized_500() {
    let client = Arc::new(StubClient::garbage());
    let app = app(client.clone());

    let payload = json!({ "quoteCount": 3, "apiKey": "sk-test", "language": "es" });
    let (status, body, _) = send(&app, post_api(payload.to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "No se pudieron generar las frases. Por favor, intenta de nuevo."
    );
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("output is not valid JSON"));
    assert_eq!(body["attempts"], 3);
    assert_eq!(client.calls(), 3);

    let payload = json!({ "quoteCount": 2, "apiKey": "sk", "language": "en" });
    let (status, body, _) = send(&app, post_api(payload.to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Unable to generate quotes. Please try again.");
    assert!(body["detail"].as_str().unwrap().contains("not valid JSON"));
}

#[tokio::test]
async fn test_error_body_hides_provider_detail() {
    let client = Arc::new(StubClient::new(vec![Err(
        "Incorrect API key provided: sk-leak".to_string(),
    )]));
    let app = app(client.clone());

    let payload = json!({ "quoteCount": 1, "apiKey": "sk-leak", "language": "en" });
    let (status, body, _) = send(&app, post_api(payload.to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.to_string().contains("sk-leak"));
    assert_eq!(body["detail"], "provider returned HTTP 500 (server_error)");
}

#[tokio::test]
async fn test_whole_float_count_is_accepted() {
    let client = Arc::new(StubClient::valid(3));
    let app = app(client.clone());

    let (status, body, _) = send(
        &app,
        post_api(r#"{"quoteCount": 3.0, "apiKey": "sk-test", "language": "en"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quotes"].as_array().unwrap().len(), 3);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_field_errors_use_request_language() {
    let client = Arc::new(StubClient::valid(1));
    let app = app(client.clone());

    let payload = json!({ "quoteCount": 11, "apiKey": "sk-test", "language": "es" });
    let (status, body, _) = send(&app, post_api(payload.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        json!([{
            "field": "quoteCount",
            "message": "La cantidad de frases debe ser un número entero entre 1 y 10"
        }])
    );
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_handler_panic_becomes_500() {
    let app = app(Arc::new(PanickingClient));

    let payload = json!({ "quoteCount": 1, "apiKey": "sk-test", "language": "en" });
    let (status, body, request_id) = send(&app, post_api(payload.to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
    assert!(request_id.is_some());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = app(Arc::new(StubClient::valid(1)));
    let request = Request::builder()
        .uri("/quotes")
        .body(Body::empty())
        .unwrap();

    let (status, _, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
