// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook route for Polka payment events.

use crate::error::{AppError, Result};
use crate::middleware::auth::api_key;
use crate::services::{accounts, authorization};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/polka/webhooks", post(handle_event))
}

/// Polka webhook event payload.
#[derive(Deserialize, Debug)]
struct WebhookEvent {
    event: String,
    data: WebhookData,
}

#[derive(Deserialize, Debug)]
struct WebhookData {
    user_id: u64,
}

/// Handle incoming webhook events (POST).
///
/// The API key is checked before the body is parsed.
async fn handle_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    if let Err(e) = authorization::ensure_webhook_key(api_key(&headers), &state.config.polka_key) {
        tracing::warn!("Rejected webhook with invalid API key");
        return Err(e);
    }

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Invalid webhook payload: {}", e)))?;

    tracing::info!(
        event = %event.event,
        user_id = event.data.user_id,
        "Webhook event received"
    );

    accounts::apply_webhook_event(&state.store, &event.event, event.data.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
