//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Path of the JSON document that holds all users and chirps
    pub database_path: PathBuf,
    /// Directory served under `/app`
    pub filepath_root: PathBuf,

    // --- Secrets ---
    /// HMAC key for access tokens (raw bytes)
    pub jwt_secret: Vec<u8>,
    /// API key the Polka payment provider presents on webhooks
    pub polka_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_secret = env::var("JWT_SECRET")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Empty("JWT_SECRET"));
        }

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "database.json".to_string())
                .into(),
            filepath_root: env::var("FILEPATH_ROOT")
                .unwrap_or_else(|_| ".".to_string())
                .into(),
            jwt_secret: jwt_secret.into_bytes(),
            polka_key: env::var("POLKA_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("POLKA_KEY"))?,
        })
    }

    /// Config for tests, pointing the store at `database_path`.
    pub fn test_default(database_path: impl Into<PathBuf>) -> Self {
        Self {
            port: 8080,
            database_path: database_path.into(),
            filepath_root: ".".into(),
            jwt_secret: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            polka_key: "test_polka_key".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Environment variable must not be empty: {0}")]
    Empty(&'static str),
}
