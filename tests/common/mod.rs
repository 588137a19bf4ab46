//! Shared helpers for the HTTP integration tests.
//!
//! Every test gets its own in-memory SQLite database, migrated and seeded
//! with the bundled catalog, behind the real router.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use storefront_api::{create_router, AppState, Config, Database};

pub const TEST_SECRET: &str = "integration-test-secret-32-chars-long";

pub struct TestApp {
    router: Router,
}

/// Response status plus the decoded JSON body (`Null` when empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = Config::new("sqlite::memory:", TEST_SECRET).unwrap();
        let db = Database::connect(&config).await.unwrap();
        db.seed(false).await.unwrap();

        Self {
            router: create_router(AppState::from_config(Arc::new(db), config)),
        }
    }

    pub fn request(&self, method: Method, uri: &str) -> RequestBuilder<'_> {
        RequestBuilder {
            app: self,
            method,
            uri: uri.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri).send().await
    }

    /// Register an account and return its bearer token.
    pub async fn register(&self, email: &str) -> String {
        let response = self
            .request(Method::POST, "/api/register")
            .json(serde_json::json!({
                "email": email,
                "password": "secret1",
                "name": "Test Shopper"
            }))
            .send()
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["token"].as_str().unwrap().to_string()
    }
}

pub struct RequestBuilder<'a> {
    app: &'a TestApp,
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Option<Value>,
}

impl RequestBuilder<'_> {
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn bearer(self, token: &str) -> Self {
        let value = format!("Bearer {}", token);
        self.header(header::AUTHORIZATION.as_str(), &value)
    }

    pub fn cart(self, key: &str) -> Self {
        self.header("x-cart-session", key)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub async fn send(self) -> TestResponse {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let request = match self.body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
