// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod chirp;
pub mod document;
pub mod user;

pub use chirp::Chirp;
pub use document::Document;
pub use user::User;

use std::collections::BTreeMap;

/// Entity kinds that get their own ID sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Chirp,
}

/// Capability shared by stored entities, used by the store's
/// duplicate check and ID allocation.
pub trait Entity: Clone {
    const KIND: EntityKind;

    fn id(&self) -> u64;

    /// Value that must be unique within the entity's collection.
    fn unique_identifier(&self) -> String;

    fn collection(doc: &Document) -> &BTreeMap<u64, Self>;

    fn collection_mut(doc: &mut Document) -> &mut BTreeMap<u64, Self>;
}
