// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account and session operations.
//!
//! Each operation holds the store lock for its entire load-mutate-save
//! cycle. Password hashing and verification run on the blocking pool with
//! the lock released.

use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::services::password::{hash_password, verify_password};
use crate::services::tokens::{generate_refresh_token, refresh_token_expiry, TokenService};
use chrono::Utc;

/// Webhook event that upgrades a user to Chirpy Red.
pub const UPGRADE_EVENT: &str = "user.upgraded";

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Create an account. Fails with `Conflict` if the email is taken.
pub async fn register(store: &DocumentStore, email: &str, password: &str) -> Result<User> {
    let password_hash = hash_in_background(password).await?;

    let mut session = store.lock().await;
    let mut doc = session.load().await?;
    let user = session
        .insert(&mut doc, |id| {
            User::new(id, email.to_string(), password_hash)
        })
        .await?;

    tracing::info!(user_id = user.id, "User registered");
    Ok(user)
}

/// Verify credentials and start a session.
///
/// The stored hash is read in one locked cycle and checked with the lock
/// released. A second locked cycle saves the new refresh token and its
/// expiry, replacing any earlier one, provided the credentials did not
/// change in between.
pub async fn login(
    store: &DocumentStore,
    tokens: &TokenService,
    email: &str,
    password: &str,
    ttl_secs: Option<i64>,
) -> Result<LoginSession> {
    let (user_id, stored_hash) = {
        let doc = store.read().await?;
        let user = doc
            .user_by_email(email)
            .ok_or_else(|| AppError::NotFound("User email does not exist".to_string()))?;
        (user.id, user.password.clone())
    };

    if !verify_in_background(password, &stored_hash).await? {
        tracing::info!(user_id, "Login rejected: bad password");
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    let access_token = tokens.issue_access_token(user_id, ttl_secs)?;
    let refresh_token = generate_refresh_token()?;

    let session = store.lock().await;
    let mut doc = session.load().await?;
    let user = doc
        .users
        .get_mut(&user_id)
        .filter(|u| u.email == email)
        .ok_or_else(|| AppError::NotFound("User email does not exist".to_string()))?;
    if user.password != stored_hash {
        tracing::info!(user_id, "Login rejected: password changed during login");
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    user.refresh_token = refresh_token.clone();
    user.refresh_token_expires_at = Some(refresh_token_expiry(Utc::now()));
    let user = user.clone();

    session.save(&doc).await?;

    tracing::info!(user_id, "User logged in");
    Ok(LoginSession {
        user,
        access_token,
        refresh_token,
    })
}

async fn verify_in_background(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::Error::new(e)))
}

async fn hash_in_background(password: &str) -> Result<String> {
    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::Error::new(e)))??;
    Ok(hash)
}

/// Exchange a live refresh token for a new access token.
///
/// The refresh token is left as is and can be used again until it expires.
pub async fn exchange_refresh_token(
    store: &DocumentStore,
    tokens: &TokenService,
    presented: &str,
) -> Result<String> {
    let session = store.lock().await;
    let mut doc = session.load().await?;

    let user = doc
        .user_by_refresh_token_mut(presented)
        .ok_or_else(|| AppError::Unauthorized(AppError::INVALID_REFRESH_TOKEN.to_string()))?;
    if user.refresh_token_expired(Utc::now()) {
        return Err(AppError::Unauthorized(
            AppError::EXPIRED_REFRESH_TOKEN.to_string(),
        ));
    }

    tokens.issue_access_token(user.id, None)
}

/// Revoke a live refresh token, ending the user's session.
pub async fn revoke_refresh_token(store: &DocumentStore, presented: &str) -> Result<()> {
    let session = store.lock().await;
    let mut doc = session.load().await?;

    let user = doc
        .user_by_refresh_token_mut(presented)
        .ok_or_else(|| AppError::Unauthorized(AppError::INVALID_REFRESH_TOKEN.to_string()))?;
    if user.refresh_token_expired(Utc::now()) {
        return Err(AppError::Unauthorized(
            AppError::EXPIRED_REFRESH_TOKEN.to_string(),
        ));
    }

    let user_id = user.id;
    user.clear_refresh_token();
    session.save(&doc).await?;

    tracing::info!(user_id, "Refresh token revoked");
    Ok(())
}

/// Change the authenticated user's email and password.
///
/// The new email must not belong to another user.
pub async fn update_credentials(
    store: &DocumentStore,
    user_id: u64,
    email: &str,
    password: &str,
) -> Result<User> {
    let password_hash = hash_in_background(password).await?;

    let session = store.lock().await;
    let mut doc = session.load().await?;

    if doc.users.values().any(|u| u.email == email && u.id != user_id) {
        return Err(AppError::Conflict(format!("User {} already exists", email)));
    }

    let user = doc
        .users
        .get_mut(&user_id)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    user.email = email.to_string();
    user.password = password_hash;
    let user = user.clone();

    session.save(&doc).await?;

    tracing::info!(user_id, "User credentials updated");
    Ok(user)
}

/// Apply a payment-provider webhook event.
///
/// Only [`UPGRADE_EVENT`] changes anything; other events succeed as no-ops.
/// Returns whether a user was upgraded.
pub async fn apply_webhook_event(store: &DocumentStore, event: &str, user_id: u64) -> Result<bool> {
    if event != UPGRADE_EVENT {
        tracing::debug!(event, "Ignoring unhandled webhook event");
        return Ok(false);
    }

    let session = store.lock().await;
    let mut doc = session.load().await?;

    let user = doc
        .users
        .get_mut(&user_id)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    user.is_chirpy_red = true;
    session.save(&doc).await?;

    tracing::info!(user_id, "User upgraded to Chirpy Red");
    Ok(true)
}
