//! The persisted aggregate: every user and every chirp.

use super::{Chirp, User};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Whole dataset, persisted as one JSON object.
///
/// Keys are integer IDs in memory; serde_json writes them as decimal strings
/// (`{"users": {"1": {...}}}`) and parses them back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub users: BTreeMap<u64, User>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub chirps: BTreeMap<u64, Chirp>,
}

impl Document {
    /// Find a user by email.
    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email == email)
    }

    /// Find the user currently holding `token` as refresh token.
    ///
    /// Full scan in ID order; an empty token never matches.
    pub fn user_by_refresh_token_mut(&mut self, token: &str) -> Option<&mut User> {
        if token.is_empty() {
            return None;
        }
        self.users.values_mut().find(|u| u.refresh_token == token)
    }

    /// Highest user ID present, or 0.
    pub fn max_user_id(&self) -> u64 {
        self.users.keys().next_back().copied().unwrap_or(0)
    }

    /// Highest chirp ID present, or 0.
    pub fn max_chirp_id(&self) -> u64 {
        self.chirps.keys().next_back().copied().unwrap_or(0)
    }
}

/// `null` collections are read as empty ones.
fn null_as_empty<'de, D, V>(deserializer: D) -> Result<BTreeMap<u64, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    Ok(Option::<BTreeMap<u64, V>>::deserialize(deserializer)?.unwrap_or_default())
}
