// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware and `Authorization` header helpers.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated user extracted from the access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
}

/// Credential following `scheme ` in the `Authorization` header.
fn authorization_credential<'a>(headers: &'a HeaderMap, scheme: &str) -> Option<&'a str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let credential = value.strip_prefix(scheme)?.strip_prefix(' ')?.trim();
    (!credential.is_empty()).then_some(credential)
}

/// Token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    authorization_credential(headers, "Bearer")
}

/// Key from `Authorization: ApiKey <key>`.
pub fn api_key(headers: &HeaderMap) -> Option<&str> {
    authorization_credential(headers, "ApiKey")
}

/// Middleware that requires a valid access token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        AppError::Unauthorized("Invalid or missing Authorization header".to_string())
    })?;

    let user_id = state.tokens.validate_access_token(token)?;

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}
