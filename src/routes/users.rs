// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User account routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::User;
use crate::services::accounts;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Public routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/users", post(create_user))
}

/// Routes that need an access token. Auth is applied in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/users", put(update_user))
}

/// Body for registration and credential updates.
#[derive(Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

impl CredentialsRequest {
    fn validated(self) -> Result<Self> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        Ok(self)
    }
}

/// User as shown by the API; never includes the password hash.
#[derive(Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub id: u64,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let req = req.validated()?;
    let user = accounts::register(&state.store, &req.email, &req.password).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<UserResponse>> {
    let req = req.validated()?;
    let user =
        accounts::update_credentials(&state.store, auth.user_id, &req.email, &req.password).await?;
    Ok(Json(user.into()))
}
