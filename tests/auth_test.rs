//! Registration, login and profile endpoint tests.

mod common;

use axum::http::{Method, StatusCode};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use uuid::Uuid;

use common::{TestApp, TEST_SECRET};
use storefront_api::services::Claims;

#[tokio::test]
async fn test_register_login_profile() {
    let app = TestApp::spawn().await;

    let registered = app
        .request(Method::POST, "/api/register")
        .json(json!({
            "email": "Shopper@Example.com",
            "password": "secret1",
            "name": "Shopper",
            "phone": "555-0100"
        }))
        .send()
        .await;
    assert_eq!(registered.status, StatusCode::CREATED);
    assert_eq!(registered.body["user"]["email"], "shopper@example.com");
    assert!(registered.body["expiresIn"].as_i64().unwrap() > 0);
    assert!(registered.body["user"].get("passwordHash").is_none());

    let login = app
        .request(Method::POST, "/api/login")
        .json(json!({ "email": "shopper@example.com", "password": "secret1" }))
        .send()
        .await;
    assert_eq!(login.status, StatusCode::OK);
    let token = login.body["token"].as_str().unwrap();

    let profile = app
        .request(Method::GET, "/api/profile")
        .bearer(token)
        .send()
        .await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["name"], "Shopper");
    assert_eq!(profile.body["phone"], "555-0100");
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let app = TestApp::spawn().await;
    app.register("dup@example.com").await;

    let again = app
        .request(Method::POST, "/api/register")
        .json(json!({ "email": "DUP@example.com", "password": "another-pass", "name": "Dup" }))
        .send()
        .await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
    assert_eq!(again.body["code"], "CONFLICT");

    let original = app
        .request(Method::POST, "/api/login")
        .json(json!({ "email": "dup@example.com", "password": "secret1" }))
        .send()
        .await;
    assert_eq!(original.status, StatusCode::OK);
    assert_eq!(original.body["user"]["name"], "Test Shopper");

    let intruder = app
        .request(Method::POST, "/api/login")
        .json(json!({ "email": "dup@example.com", "password": "another-pass" }))
        .send()
        .await;
    assert_eq!(intruder.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::spawn().await;

    for body in [
        json!({ "email": "not-an-email", "password": "secret1", "name": "A" }),
        json!({ "email": "a@example.com", "password": "short", "name": "A" }),
        json!({ "email": "a@example.com", "password": "secret1", "name": "" }),
    ] {
        let response = app
            .request(Method::POST, "/api/register")
            .json(body)
            .send()
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_login_failures_look_alike() {
    let app = TestApp::spawn().await;
    app.register("known@example.com").await;

    let wrong_password = app
        .request(Method::POST, "/api/login")
        .json(json!({ "email": "known@example.com", "password": "wrong-pass" }))
        .send()
        .await;
    let unknown_email = app
        .request(Method::POST, "/api/login")
        .json(json!({ "email": "nobody@example.com", "password": "secret1" }))
        .send()
        .await;

    assert_eq!(wrong_password.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password.body, unknown_email.body);
}

#[tokio::test]
async fn test_profile_rejects_bad_tokens() {
    let app = TestApp::spawn().await;
    let now = Utc::now().timestamp();

    let expired = encode(
        &Header::default(),
        &Claims {
            sub: Uuid::new_v4(),
            email: "late@example.com".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        },
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let forged = encode(
        &Header::default(),
        &Claims {
            sub: Uuid::new_v4(),
            email: "forger@example.com".to_string(),
            exp: now + 3600,
            iat: now,
        },
        &EncodingKey::from_secret(b"some-other-secret-that-is-32-chars-long"),
    )
    .unwrap();

    for token in [expired.as_str(), forged.as_str(), "garbage"] {
        let response = app
            .request(Method::GET, "/api/profile")
            .bearer(token)
            .send()
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    let missing = app.get("/api/profile").await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_account_is_not_found() {
    let app = TestApp::spawn().await;
    let now = Utc::now().timestamp();

    let token = encode(
        &Header::default(),
        &Claims {
            sub: Uuid::new_v4(),
            email: "ghost@example.com".to_string(),
            exp: now + 3600,
            iat: now,
        },
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let response = app
        .request(Method::GET, "/api/profile")
        .bearer(&token)
        .send()
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
