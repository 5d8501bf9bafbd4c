mod helpers;

use helpers::{unused_base_url, Route, StubServer};
use serde_json::json;
use tagsmith::application::TagGenerator;
use tagsmith::domain::ApiError;
use tagsmith::infrastructure::NlpClient;

#[test]
fn given_successful_service_when_generating_then_posts_text_and_returns_tags() {
    // Arrange
    let server = StubServer::start(vec![Route::new(
        "POST",
        "/api/generate-tags",
        200,
        json!({"tags": ["::Topic/AI", "@Person/Ada Lovelace"], "success": true, "message": ""}),
    )]);
    let client = NlpClient::new(&server.base_url, 5).unwrap();

    // Act
    let tags = client.generate("Ada Lovelace wrote about engines").unwrap();

    // Assert
    assert_eq!(tags, vec!["::Topic/AI", "@Person/Ada Lovelace"]);
    let request = server.last_request();
    assert_eq!(request.json()["text"], "Ada Lovelace wrote about engines");
    assert!(request
        .header("content-type")
        .is_some_and(|v| v.starts_with("application/json")));
}

#[test]
fn given_unsuccessful_payload_when_generating_then_generation_error() {
    let server = StubServer::start(vec![Route::new(
        "POST",
        "/api/generate-tags",
        200,
        json!({"tags": [], "success": false, "message": "Text too short"}),
    )]);
    let client = NlpClient::new(&server.base_url, 5).unwrap();

    let err = client.generate("hi").unwrap_err();

    assert_eq!(err, ApiError::Generation("Text too short".to_string()));
}

#[test]
fn given_server_error_when_generating_then_rejected_with_detail() {
    let server = StubServer::start(vec![Route::new(
        "POST",
        "/api/generate-tags",
        500,
        json!({"detail": "model not loaded"}),
    )]);
    let client = NlpClient::new(&server.base_url, 5).unwrap();

    let err = client.generate("some text").unwrap_err();

    assert_eq!(
        err,
        ApiError::Rejected {
            status: 500,
            message: "model not loaded".to_string()
        }
    );
}

#[test]
fn given_no_server_when_generating_then_unreachable_names_service_and_url() {
    let base = unused_base_url();
    let client = NlpClient::new(&base, 2).unwrap();

    let err = client.generate("some text").unwrap_err();

    match err {
        ApiError::Unreachable { service, .. } => {
            assert!(service.contains("tag generation service"));
            assert!(service.contains(&base));
        }
        other => panic!("Expected Unreachable, got {other:?}"),
    }
}

#[test]
fn given_healthy_service_when_probing_then_returns_status() {
    let server = StubServer::start(vec![Route::new(
        "GET",
        "/health",
        200,
        json!({"status": "healthy"}),
    )]);
    let client = NlpClient::new(&server.base_url, 5).unwrap();

    assert_eq!(client.health().unwrap(), "healthy");
}
