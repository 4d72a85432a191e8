// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login and refresh token routes.

use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::bearer_token;
use crate::services::accounts;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/refresh", post(refresh))
        .route("/api/revoke", post(revoke))
}

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Requested access token lifetime; out-of-range values fall back to one hour.
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

/// Login response.
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub id: u64,
    pub email: String,
    pub is_chirpy_red: bool,
    pub token: String,
    pub refresh_token: String,
}

/// Refresh response.
#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub token: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let session = accounts::login(
        &state.store,
        &state.tokens,
        &req.email,
        &req.password,
        req.expires_in_seconds,
    )
    .await?;

    Ok(Json(LoginResponse {
        id: session.user.id,
        email: session.user.email,
        is_chirpy_red: session.user.is_chirpy_red,
        token: session.access_token,
        refresh_token: session.refresh_token,
    }))
}

fn presented_refresh_token(headers: &HeaderMap) -> Result<&str> {
    bearer_token(headers)
        .ok_or_else(|| AppError::Unauthorized("Invalid or missing Authorization header".to_string()))
}

/// Exchange the refresh token in `Authorization: Bearer` for an access token.
async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>> {
    let presented = presented_refresh_token(&headers)?;
    let token = accounts::exchange_refresh_token(&state.store, &state.tokens, presented).await?;
    Ok(Json(TokenResponse { token }))
}

/// Revoke the refresh token in `Authorization: Bearer`.
async fn revoke(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<StatusCode> {
    let presented = presented_refresh_token(&headers)?;
    accounts::revoke_refresh_token(&state.store, presented).await?;
    Ok(StatusCode::NO_CONTENT)
}
