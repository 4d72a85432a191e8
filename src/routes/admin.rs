// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin routes for the file server hit counter.

use crate::AppState;
use axum::{
    extract::State,
    response::Html,
    routing::get,
    Router,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/metrics", get(hits))
        .route("/api/reset", get(reset))
        .route("/admin/metrics", get(metrics))
}

async fn hits(State(state): State<Arc<AppState>>) -> String {
    format!("Hits: {}", state.fileserver_hits.load(Ordering::Relaxed))
}

async fn metrics(State(state): State<Arc<AppState>>) -> Html<String> {
    let hits = state.fileserver_hits.load(Ordering::Relaxed);
    Html(format!(
        "<html>\n<body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n</body>\n</html>",
        hits
    ))
}

async fn reset(State(state): State<Arc<AppState>>) -> &'static str {
    state.fileserver_hits.store(0, Ordering::Relaxed);
    tracing::info!("File server hit counter reset");
    "Hits reset to 0"
}
