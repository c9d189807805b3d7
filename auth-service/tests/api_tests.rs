mod common;

use std::sync::Arc;

use auth::ManualClock;
use auth::TokenIssuer;
use chrono::Utc;
use common::access_token_set_cookie;
use common::cookie_value;
use common::TestApp;
use common::TEST_SECRET;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": "nicola",
            "email": "nicola@example.com",
            "password": "pass_word!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "message": "user registered successfully" }));
    assert!(app.repository.id_for_email("nicola@example.com").is_some());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;
    app.register("nicola", "nicola@example.com", "pass_word!")
        .await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": "nicola2",
            "email": "nicola@example.com",
            "password": "pass_word!2"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "email already exists" }));
}

#[tokio::test]
async fn test_register_invalid_username() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": "n",
            "email": "nicola@example.com",
            "password": "pass_word"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["error"].as_str().unwrap().contains("username"));
}

#[tokio::test]
async fn test_register_malformed_body() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({ "username": "nicola" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "invalid request body" }));
}

#[tokio::test]
async fn test_login_sets_http_only_cookie() {
    let app = TestApp::spawn().await;
    app.register("nicola", "nicola@example.com", "pass_word!")
        .await;

    let response = app.login("nicola@example.com", "pass_word!").await;

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = access_token_set_cookie(&response).expect("access_token cookie should be set");
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=900"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(!cookie_value(&set_cookie).is_empty());

    // The token travels only in the cookie
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "success": true }));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::spawn().await;
    app.register("nicola", "nicola@example.com", "pass_word!")
        .await;

    let response = app.login("nicola@example.com", "not_the_password").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(access_token_set_cookie(&response).is_none());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "invalid credentials" }));
}

#[tokio::test]
async fn test_login_unknown_email_matches_wrong_password() {
    let app = TestApp::spawn().await;

    let response = app.login("nobody@example.com", "pass_word!").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "invalid credentials" }));
}

#[tokio::test]
async fn test_current_user_after_login() {
    let app = TestApp::spawn().await;
    let user_id = app
        .register("nicola", "nicola@example.com", "pass_word!")
        .await;

    let login = app.login("nicola@example.com", "pass_word!").await;
    let set_cookie = access_token_set_cookie(&login).expect("access_token cookie should be set");

    let response = app
        .get_with_token("/api/user", &cookie_value(&set_cookie))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert_eq!(body["user"]["username"], "nicola");
    assert_eq!(body["user"]["email"], "nicola@example.com");
    assert!(body["user"]["created_at"].is_string());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_current_user_without_cookie() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/user")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "token missing" }));
}

#[tokio::test]
async fn test_current_user_bearer_header_rejected() {
    let app = TestApp::spawn().await;
    let user_id = app
        .register("nicola", "nicola@example.com", "pass_word!")
        .await;
    let token = app.token_issuer.issue(&user_id).unwrap();

    let response = app
        .get("/api/user")
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "token missing" }));
}

#[tokio::test]
async fn test_current_user_foreign_secret() {
    let app = TestApp::spawn().await;
    let user_id = app
        .register("nicola", "nicola@example.com", "pass_word!")
        .await;
    let token = TokenIssuer::new(b"another-secret-key-that-is-also-32-bytes")
        .issue(&user_id)
        .unwrap();

    let response = app
        .get_with_token("/api/user", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "invalid token" }));
}

#[tokio::test]
async fn test_current_user_expired_token() {
    let app = TestApp::spawn().await;
    let user_id = app
        .register("nicola", "nicola@example.com", "pass_word!")
        .await;

    let issued_at = Utc::now() - chrono::Duration::minutes(16);
    let token = TokenIssuer::with_clock(TEST_SECRET, Arc::new(ManualClock::new(issued_at)))
        .issue(&user_id)
        .unwrap();

    let response = app
        .get_with_token("/api/user", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "invalid token" }));
}

#[tokio::test]
async fn test_current_user_deleted_after_login() {
    let app = TestApp::spawn().await;
    let user_id = app
        .register("nicola", "nicola@example.com", "pass_word!")
        .await;
    let token = app.token_issuer.issue(&user_id).unwrap();

    app.repository.remove(&user_id);

    let response = app
        .get_with_token("/api/user", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "user not found" }));
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/logout")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = access_token_set_cookie(&response).expect("access_token cookie should be set");
    assert!(set_cookie.contains("Max-Age=0"));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(cookie_value(&set_cookie).is_empty());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "success": true }));
}
