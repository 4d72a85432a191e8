// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod accounts;
pub mod authorization;
pub mod chirps;
pub mod content;
pub mod password;
pub mod tokens;

pub use chirps::SortOrder;
pub use tokens::TokenService;
