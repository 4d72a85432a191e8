// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chirp routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Chirp;
use crate::services::{chirps, content, SortOrder};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Public routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/chirps", get(list_chirps))
        .route("/api/chirps/{id}", get(get_chirp))
}

/// Routes that need an access token. Auth is applied in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/chirps", post(create_chirp))
        .route("/api/chirps/{id}", delete(delete_chirp))
}

#[derive(Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

#[derive(Deserialize)]
struct ListQuery {
    author_id: Option<u64>,
    sort: Option<String>,
}

async fn create_chirp(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateChirpRequest>,
) -> Result<(StatusCode, Json<Chirp>)> {
    let body = content::clean_chirp_body(&req.body)?;
    let chirp = chirps::create(&state.store, auth.user_id, body).await?;
    Ok((StatusCode::CREATED, Json(chirp)))
}

async fn list_chirps(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Chirp>>> {
    Ok(Json(
        chirps::list(
            &state.store,
            query.author_id,
            SortOrder::from_query(query.sort.as_deref()),
        )
        .await?,
    ))
}

async fn get_chirp(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Chirp>> {
    Ok(Json(chirps::get(&state.store, id).await?))
}

async fn delete_chirp(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    chirps::delete(&state.store, id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
