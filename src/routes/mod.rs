// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod admin;
pub mod auth;
pub mod chirps;
pub mod users;
pub mod webhook;

use crate::middleware::auth::require_auth;
use crate::middleware::metrics::count_hits;
use crate::AppState;
use axum::http::{header, Method};
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Readiness check
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/healthz", get(health_check))
        .merge(auth::routes())
        .merge(users::routes())
        .merge(chirps::routes())
        .merge(webhook::routes())
        .merge(admin::routes());

    // Protected routes (access token required)
    let protected_routes = Router::new()
        .merge(users::protected_routes())
        .merge(chirps::protected_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Static files, counted by the hit counter
    let file_server = Router::new()
        .nest_service("/app", ServeDir::new(&state.config.filepath_root))
        .layer(middleware::from_fn_with_state(state.clone(), count_hits));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(file_server)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
