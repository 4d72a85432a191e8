// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ownership and API-key checks.

use crate::error::AppError;
use crate::models::Chirp;
use subtle::ConstantTimeEq;

/// Only a chirp's author may delete it.
pub fn can_delete(chirp: &Chirp, requesting_user_id: u64) -> bool {
    chirp.author_id == requesting_user_id
}

/// `Forbidden` unless `requesting_user_id` authored `chirp`.
pub fn ensure_can_delete(chirp: &Chirp, requesting_user_id: u64) -> Result<(), AppError> {
    if can_delete(chirp, requesting_user_id) {
        Ok(())
    } else {
        tracing::warn!(
            chirp_id = chirp.id,
            author_id = chirp.author_id,
            user_id = requesting_user_id,
            "Blocked delete of another user's chirp"
        );
        Err(AppError::Forbidden(
            "You do not have permission to delete this chirp".to_string(),
        ))
    }
}

/// Exact match of a presented webhook API key against the configured one.
/// An empty configured key never matches.
pub fn can_receive_webhook(presented_key: &str, configured_key: &str) -> bool {
    !configured_key.is_empty()
        && bool::from(presented_key.as_bytes().ct_eq(configured_key.as_bytes()))
}

/// `Unauthorized` unless the presented key matches.
pub fn ensure_webhook_key(presented_key: Option<&str>, configured_key: &str) -> Result<(), AppError> {
    match presented_key {
        Some(key) if can_receive_webhook(key, configured_key) => Ok(()),
        _ => Err(AppError::Unauthorized("Invalid API key".to_string())),
    }
}
