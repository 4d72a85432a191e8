// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chirpy::config::Config;
use chirpy::routes::create_router;
use chirpy::AppState;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Test app backed by a document in a fresh temp directory.
/// Keep the `TempDir` alive for the duration of the test.
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub dir: TempDir,
}

/// Create a test app with an empty document store.
#[allow(dead_code)]
pub async fn create_test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = Config::test_default(dir.path().join("database.json"));
    let state = Arc::new(
        AppState::new(config)
            .await
            .expect("Failed to open document store"),
    );

    TestApp {
        router: create_router(state.clone()),
        state,
        dir,
    }
}

/// Send a request and return the status and JSON body (`Null` when empty).
#[allow(dead_code)]
pub async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&body).into_owned())
        })
    };
    (status, json)
}

/// Build a JSON request, optionally with an `Authorization` header.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    authorization: Option<&str>,
    body: &Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = authorization {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Build a body-less request, optionally with an `Authorization` header.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = authorization {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

/// Register a user, log in, and return the login response body.
#[allow(dead_code)]
pub async fn register_and_login(app: &TestApp, email: &str, password: &str) -> Value {
    let creds = serde_json::json!({ "email": email, "password": password });
    let (status, _) = send(app, json_request("POST", "/api/users", None, &creds)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, json_request("POST", "/api/login", None, &creds)).await;
    assert_eq!(status, StatusCode::OK);
    body
}
