//! OpenAiClient against a mock chat completions endpoint.

use mockito::{Matcher, Server, ServerGuard};
use quotegen::client::types::CompletionRequest;
use quotegen::client::{GenerationClient, OpenAiClient};
use quotegen::error::GenerationError;
use quotegen::prompt::build_directives;
use quotegen::structured::JsonMode;
use quotegen::transport::TransportConfig;
use quotegen::{Error, Language};
use serde_json::json;
use std::time::Duration;

const CREDENTIAL: &str = "sk-test-credential";

fn client_for(server: &ServerGuard) -> OpenAiClient {
    let config = TransportConfig {
        base_url: server.url(),
        timeout: Duration::from_secs(5),
        ..TransportConfig::default()
    };
    OpenAiClient::new(&config).expect("client builds")
}

async fn call(client: &OpenAiClient) -> quotegen::Result<String> {
    let directives = build_directives(2, Language::En);
    client
        .generate(CREDENTIAL, "gpt-4-turbo", &directives, 0.7)
        .await
}

#[tokio::test]
async fn test_returns_first_choice_content() {
    let mut server = Server::new_async().await;
    let content = r#"{"quotes":[{"author":"Grace Hopper","quote":"The most dangerous phrase is: we've always done it this way."}]}"#;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", format!("Bearer {}", CREDENTIAL).as_str())
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-4-turbo",
            "response_format": { "type": "json_object" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "chatcmpl-1",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": content },
                    "finish_reason": "stop"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let text = call(&client_for(&server)).await.unwrap();
    assert_eq!(text, content);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_sends_both_directives() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex(r#""role":"system".*"role":"user""#.to_string()))
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"content":"{}"}}]}"#)
        .create_async()
        .await;

    call(&client_for(&server)).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_json_mode_off_omits_response_format() {
    let directives = build_directives(2, Language::En);
    let expected = serde_json::to_value(CompletionRequest {
        model: "gpt-4-turbo".to_string(),
        messages: directives.to_messages(),
        temperature: 0.7,
        response_format: None,
    })
    .unwrap();

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Json(expected))
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"content":"plain"}}]}"#)
        .create_async()
        .await;

    let client = client_for(&server).with_json_mode(JsonMode::Off);
    assert_eq!(call(&client).await.unwrap(), "plain");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_choices_is_empty_content() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let err = call(&client_for(&server)).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Generation(GenerationError::EmptyContent)
    ));
}

#[tokio::test]
async fn test_null_content_is_empty_content() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
        .create_async()
        .await;

    let err = call(&client_for(&server)).await.unwrap_err();
    assert_eq!(err.into_generation_error().kind(), "empty_content");
}

#[tokio::test]
async fn test_unauthorized_body_is_surfaced() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "error": {
                    "message": "Incorrect API key provided: sk-test-***.",
                    "type": "invalid_request_error",
                    "code": "invalid_api_key"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let err = call(&client_for(&server)).await.unwrap_err();
    match err {
        Error::Remote {
            status,
            ref class,
            ref message,
            retryable,
        } => {
            assert_eq!(status, 401);
            assert_eq!(class, "authentication");
            assert!(message.starts_with("Incorrect API key provided"));
            assert!(!retryable);
        }
        ref other => panic!("expected remote error, got {}", other),
    }
    assert!(matches!(
        err.into_generation_error(),
        GenerationError::Unauthorized { status: 401, .. }
    ));
}

#[tokio::test]
async fn test_server_error_with_plain_body() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(503)
        .with_body("upstream overloaded")
        .create_async()
        .await;

    let err = call(&client_for(&server)).await.unwrap_err();
    match err {
        Error::Remote {
            status,
            message,
            retryable,
            ..
        } => {
            assert_eq!(status, 503);
            assert_eq!(message, "upstream overloaded");
            assert!(retryable);
        }
        other => panic!("expected remote error, got {}", other),
    }
}
