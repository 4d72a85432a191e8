//! Chirp model.

use super::{Entity, EntityKind};
use crate::models::document::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A short post owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: u64,
    pub body: String,
    pub author_id: u64,
}

impl Entity for Chirp {
    const KIND: EntityKind = EntityKind::Chirp;

    fn id(&self) -> u64 {
        self.id
    }

    fn unique_identifier(&self) -> String {
        self.id.to_string()
    }

    fn collection(doc: &Document) -> &BTreeMap<u64, Self> {
        &doc.chirps
    }

    fn collection_mut(doc: &mut Document) -> &mut BTreeMap<u64, Self> {
        &mut doc.chirps
    }
}
