mod helpers;

use helpers::{Route, StubServer};
use serde_json::{json, Value};
use tagsmith::application::{AdminGateway, AuthContext, AuthGateway, TokenStore};
use tagsmith::domain::{ApiError, DomainError, PlanDraft, PlanTier, SessionTokens};
use tagsmith::infrastructure::{AuthClient, FileTokenStore};
use tempfile::TempDir;

fn user_json(email: &str, used: i64) -> Value {
    json!({
        "_id": "64f0c0ffee",
        "name": "Ada",
        "email": email,
        "role": "user",
        "subscription": {"plan": "plus", "status": "active"},
        "isEmailVerified": true,
        "apiUsage": {"requestsThisMonth": used, "monthlyLimit": 150}
    })
}

#[test]
fn given_valid_credentials_when_logging_in_then_returns_user_and_tokens() {
    // Arrange
    let server = StubServer::start(vec![Route::new(
        "POST",
        "/api/auth/login",
        200,
        json!({
            "success": true,
            "data": {
                "user": user_json("ada@example.com", 3),
                "tokens": {"accessToken": "acc", "refreshToken": "ref"}
            }
        }),
    )]);
    let client = AuthClient::new(&server.base_url, 5).unwrap();

    // Act
    let grant = client.login("ada@example.com", "secret").unwrap();

    // Assert
    assert_eq!(grant.user.id, "64f0c0ffee");
    assert_eq!(grant.user.subscription.plan, PlanTier::Plus);
    assert_eq!(grant.user.api_usage.requests_this_month, 3);
    let tokens = grant.tokens.unwrap();
    assert_eq!(tokens.access_token, "acc");
    assert_eq!(tokens.refresh_token.as_deref(), Some("ref"));
    assert_eq!(
        server.last_request().json(),
        json!({"email": "ada@example.com", "password": "secret"})
    );
}

#[test]
fn given_wrong_password_when_logging_in_then_unauthorized_with_server_message() {
    let server = StubServer::start(vec![Route::new(
        "POST",
        "/api/auth/login",
        401,
        json!({"success": false, "message": "Invalid email or password"}),
    )]);
    let client = AuthClient::new(&server.base_url, 5).unwrap();

    let err = client.login("ada@example.com", "wrong").unwrap_err();

    assert_eq!(
        err,
        ApiError::Unauthorized("Invalid email or password".to_string())
    );
}

#[test]
fn given_access_token_when_fetching_me_then_sends_bearer_header() {
    let server = StubServer::start(vec![Route::new(
        "GET",
        "/api/auth/me",
        200,
        json!({"success": true, "data": {"user": user_json("ada@example.com", 0)}}),
    )]);
    let client = AuthClient::new(&server.base_url, 5).unwrap();

    let user = client.me("acc").unwrap();

    assert_eq!(user.email, "ada@example.com");
    assert_eq!(server.last_request().header("authorization"), Some("Bearer acc"));
}

#[test]
fn given_admin_token_when_changing_user_plan_then_patches_plan_name() {
    let server = StubServer::start(vec![Route::new(
        "PATCH",
        "/api/admin/users/u42/plan",
        200,
        json!({"success": true}),
    )]);
    let client = AuthClient::new(&server.base_url, 5).unwrap();

    client.update_user_plan("adm", "u42", PlanTier::Pro).unwrap();

    let request = server.last_request();
    assert_eq!(request.method, "PATCH");
    assert_eq!(request.json(), json!({"plan": "pro"}));
}

#[test]
fn given_user_id_with_reserved_characters_when_deleting_then_id_stays_one_segment() {
    let server = StubServer::start(vec![Route::new(
        "DELETE",
        "/api/admin/users/u%2F42%3Fx",
        200,
        json!({"success": true}),
    )]);
    let client = AuthClient::new(&server.base_url, 5).unwrap();

    client.delete_user("adm", "u/42?x").unwrap();

    assert_eq!(server.last_request().path, "/api/admin/users/u%2F42%3Fx");
}

#[test]
fn given_partial_draft_when_updating_plan_then_sends_only_given_fields() {
    let server = StubServer::start(vec![Route::new(
        "PATCH",
        "/api/admin/plans/p1",
        200,
        json!({"success": true, "data": {"_id": "p1", "name": "Plus", "price": 12.0, "monthlyLimit": 150}}),
    )]);
    let client = AuthClient::new(&server.base_url, 5).unwrap();
    let draft = PlanDraft {
        price: Some(12.0),
        ..Default::default()
    };

    let plan = client.update_plan("adm", "p1", &draft).unwrap();

    assert_eq!(plan.price, 12.0);
    assert_eq!(server.last_request().json(), json!({"price": 12.0}));
}

#[test]
fn given_expired_access_token_when_hydrating_then_refreshes_and_retries_once() {
    // Arrange
    let server = StubServer::start(vec![
        Route::new("GET", "/api/auth/me", 401, json!({"message": "jwt expired"})),
        Route::new(
            "GET",
            "/api/auth/me",
            200,
            json!({"data": {"user": user_json("ada@example.com", 7)}}),
        ),
        Route::new(
            "POST",
            "/api/auth/refresh",
            200,
            json!({"success": true, "data": {"accessToken": "fresh"}}),
        ),
    ]);
    let temp_dir = TempDir::new().unwrap();
    let store = FileTokenStore::new(temp_dir.path().join("session.json"));
    store
        .save(&SessionTokens::new("stale", Some("ref".to_string())))
        .unwrap();
    let mut session = AuthContext::new(AuthClient::new(&server.base_url, 5).unwrap(), store.clone());

    // Act
    let user = session.hydrate().unwrap().cloned();

    // Assert
    assert_eq!(user.map(|u| u.api_usage.requests_this_month), Some(7));
    let paths: Vec<String> = server.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/api/auth/me", "/api/auth/refresh", "/api/auth/me"]);
    assert_eq!(
        server.requests()[2].header("authorization"),
        Some("Bearer fresh")
    );
    let persisted = store.load().unwrap().unwrap();
    assert_eq!(persisted.access_token, "fresh");
    assert_eq!(persisted.refresh_token.as_deref(), Some("ref"));
}

#[test]
fn given_rejected_refresh_when_hydrating_then_session_file_removed() {
    let server = StubServer::start(vec![
        Route::new("GET", "/api/auth/me", 401, json!({"message": "jwt expired"})),
        Route::new("POST", "/api/auth/refresh", 401, json!({"message": "invalid refresh token"})),
    ]);
    let temp_dir = TempDir::new().unwrap();
    let store = FileTokenStore::new(temp_dir.path().join("session.json"));
    store
        .save(&SessionTokens::new("stale", Some("ref".to_string())))
        .unwrap();
    let mut session = AuthContext::new(AuthClient::new(&server.base_url, 5).unwrap(), store.clone());

    let result = session.hydrate();

    assert!(matches!(result, Err(DomainError::SessionExpired)));
    assert!(!store.path().exists());
}
