// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Chirpy: a small social-post API.
//!
//! Users register, log in for short-lived access tokens plus a rotating
//! refresh token, and post chirps. All state lives in one JSON document
//! guarded by a single lock.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::DocumentStore;
use services::TokenService;
use std::sync::atomic::AtomicU64;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: DocumentStore,
    pub tokens: TokenService,
    /// Requests served under `/app`
    pub fileserver_hits: AtomicU64,
}

impl AppState {
    /// Build state from config, opening the document store.
    pub async fn new(config: Config) -> Result<Self, db::StoreError> {
        let store = DocumentStore::open(&config.database_path).await?;
        let tokens = TokenService::new(&config.jwt_secret);
        Ok(Self {
            config,
            store,
            tokens,
            fileserver_hits: AtomicU64::new(0),
        })
    }
}
