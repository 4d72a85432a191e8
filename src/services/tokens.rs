// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access token signing/validation and refresh token generation.

use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};

/// `iss` claim on every access token.
pub const ISSUER: &str = "chirpy";
/// Access token lifetime when the caller asks for nothing valid.
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 60 * 60;
/// Longest access token lifetime a caller may request.
pub const MAX_ACCESS_TTL_SECS: i64 = 24 * 60 * 60;
/// Refresh token lifetime.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;
/// Random bytes per refresh token (hex encoded to twice as many chars).
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Issuer, always [`ISSUER`]
    pub iss: String,
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Clamp a requested TTL to `(0, MAX_ACCESS_TTL_SECS]`, else the default.
pub fn effective_ttl(requested: Option<i64>) -> i64 {
    match requested {
        Some(ttl) if ttl > 0 && ttl <= MAX_ACCESS_TTL_SECS => ttl,
        _ => DEFAULT_ACCESS_TTL_SECS,
    }
}

/// Signs and validates HS256 access tokens with the server secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue an access token for `user_id`, valid for the effective TTL.
    pub fn issue_access_token(&self, user_id: u64, ttl_secs: Option<i64>) -> Result<String, AppError> {
        self.issue_access_token_at(user_id, ttl_secs, Utc::now())
    }

    /// Issue an access token as if the current time were `now`.
    pub fn issue_access_token_at(
        &self,
        user_id: u64,
        ttl_secs: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let ttl = effective_ttl(ttl_secs);
        let claims = Claims {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {}", e)))
    }

    /// Validate an access token and return its user ID.
    pub fn validate_access_token(&self, token: &str) -> Result<u64, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected");
                AppError::Unauthorized("Invalid or expired access token".to_string())
            })?;

        token_data
            .claims
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
    }
}

/// Generate a new opaque refresh token (hex of 32 CSPRNG bytes).
pub fn generate_refresh_token() -> Result<String, AppError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::Randomness("System RNG failed".to_string()))?;
    Ok(hex::encode(bytes))
}

/// Expiry for a refresh token issued at `now`.
pub fn refresh_token_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(REFRESH_TOKEN_TTL_DAYS)
}
