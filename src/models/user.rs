//! User model for storage and API.

use super::{Entity, EntityKind};
use crate::models::document::Document;
use crate::time_utils::zero_time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User account stored in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Sequential user ID (also the document key)
    pub id: u64,
    /// Login identifier, unique across users
    pub email: String,
    /// Argon2 PHC string; never the plaintext
    pub password: String,
    /// Current refresh token (empty when none issued)
    #[serde(default)]
    pub refresh_token: String,
    /// Absolute expiry of `refresh_token`
    #[serde(default, with = "zero_time")]
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
    /// Paid tier flag, set by the Polka webhook
    #[serde(default)]
    pub is_chirpy_red: bool,
}

impl User {
    /// New account with no session.
    pub fn new(id: u64, email: String, password_hash: String) -> Self {
        Self {
            id,
            email,
            password: password_hash,
            refresh_token: String::new(),
            refresh_token_expires_at: None,
            is_chirpy_red: false,
        }
    }

    /// Whether the stored refresh token has expired as of `now`.
    /// A token with no expiry is treated as expired.
    pub fn refresh_token_expired(&self, now: DateTime<Utc>) -> bool {
        match self.refresh_token_expires_at {
            Some(expires_at) => now > expires_at,
            None => true,
        }
    }

    /// Drop the refresh token and reset its expiry to the zero value.
    pub fn clear_refresh_token(&mut self) {
        self.refresh_token.clear();
        self.refresh_token_expires_at = None;
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> u64 {
        self.id
    }

    fn unique_identifier(&self) -> String {
        self.email.clone()
    }

    fn collection(doc: &Document) -> &BTreeMap<u64, Self> {
        &doc.users
    }

    fn collection_mut(doc: &mut Document) -> &mut BTreeMap<u64, Self> {
        &mut doc.users
    }
}
