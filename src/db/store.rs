// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Whole-file JSON document store.
//!
//! Every logical operation runs as one critical section:
//! - [`DocumentStore::lock`] acquires the single store lock
//! - [`StoreSession::load`] reads the full document
//! - the caller mutates its in-memory copy
//! - [`StoreSession::save`] replaces the file
//!
//! The guard is dropped on every exit path, so an I/O error releases the
//! lock as soon as it propagates.

use crate::error::AppError;
use crate::models::{Document, Entity, EntityKind};
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, MutexGuard};

/// Next-ID counters, one per entity kind.
#[derive(Debug)]
pub struct IdAllocator {
    next_user_id: u64,
    next_chirp_id: u64,
}

impl IdAllocator {
    /// Counters that continue after the highest IDs in `doc`.
    pub fn seeded_from(doc: &Document) -> Self {
        Self {
            next_user_id: doc.max_user_id() + 1,
            next_chirp_id: doc.max_chirp_id() + 1,
        }
    }

    fn counter(&mut self, kind: EntityKind) -> &mut u64 {
        match kind {
            EntityKind::User => &mut self.next_user_id,
            EntityKind::Chirp => &mut self.next_chirp_id,
        }
    }

    /// Hand out the next ID for `kind`.
    pub fn allocate(&mut self, kind: EntityKind) -> u64 {
        let counter = self.counter(kind);
        let id = *counter;
        *counter += 1;
        id
    }

    /// Give back the most recently allocated ID for `kind`.
    pub fn rollback(&mut self, kind: EntityKind) {
        let counter = self.counter(kind);
        *counter = counter.saturating_sub(1).max(1);
    }

    /// The ID the next `allocate(kind)` would return.
    pub fn peek(&self, kind: EntityKind) -> u64 {
        match kind {
            EntityKind::User => self.next_user_id,
            EntityKind::Chirp => self.next_chirp_id,
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::seeded_from(&Document::default())
    }
}

/// Handle to the JSON document on disk. Share it through `Arc<AppState>`.
#[derive(Debug)]
pub struct DocumentStore {
    path: PathBuf,
    ids: Mutex<IdAllocator>,
}

impl DocumentStore {
    /// Open the store at `path`. The file need not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let doc = read_document(&path).await?;
        let ids = IdAllocator::seeded_from(&doc);

        tracing::info!(
            path = %path.display(),
            users = doc.users.len(),
            chirps = doc.chirps.len(),
            "Document store opened"
        );

        Ok(Self {
            path,
            ids: Mutex::new(ids),
        })
    }

    /// Acquire the store lock for one load-mutate-save cycle.
    pub async fn lock(&self) -> StoreSession<'_> {
        StoreSession {
            path: &self.path,
            ids: self.ids.lock().await,
        }
    }

    /// Load a consistent snapshot for a read-only operation.
    pub async fn read(&self) -> Result<Document, StoreError> {
        self.lock().await.load().await
    }
}

/// Exclusive access to the document for the lifetime of the value.
pub struct StoreSession<'a> {
    path: &'a Path,
    ids: MutexGuard<'a, IdAllocator>,
}

impl StoreSession<'_> {
    /// Read the full document. A missing file is an empty document.
    pub async fn load(&self) -> Result<Document, StoreError> {
        read_document(self.path).await
    }

    /// Replace the file with `doc`.
    ///
    /// Writes a sibling temp file and renames it into place so a reader
    /// never observes a partially written document.
    pub async fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(doc).map_err(StoreError::Serialize)?;

        let tmp_path = temp_path(self.path);
        tokio::fs::write(&tmp_path, &bytes)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp_path.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp_path, self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.to_path_buf(),
                source,
            })?;

        tracing::debug!(
            bytes = bytes.len(),
            users = doc.users.len(),
            chirps = doc.chirps.len(),
            "Document saved"
        );
        Ok(())
    }

    /// ID allocator, guarded by this session's lock.
    pub fn ids(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    /// Allocate an ID, build the entity, and persist it.
    ///
    /// A duplicate unique identifier fails with `Conflict`. The allocated ID
    /// is rolled back on conflict or failed save, keeping IDs contiguous.
    pub async fn insert<E, F>(&mut self, doc: &mut Document, build: F) -> Result<E, AppError>
    where
        E: Entity,
        F: FnOnce(u64) -> E,
    {
        let id = self.ids.allocate(E::KIND);
        let entity = build(id);

        let key = entity.unique_identifier();
        if E::collection(doc)
            .values()
            .any(|existing| existing.unique_identifier() == key)
        {
            self.ids.rollback(E::KIND);
            return Err(AppError::Conflict(format!(
                "{:?} {} already exists",
                E::KIND,
                key
            )));
        }

        E::collection_mut(doc).insert(entity.id(), entity.clone());

        if let Err(e) = self.save(doc).await {
            E::collection_mut(doc).remove(&id);
            self.ids.rollback(E::KIND);
            tracing::warn!(kind = ?E::KIND, id, "Rolled back ID after failed save");
            return Err(e.into());
        }

        Ok(entity)
    }
}

async fn read_document(path: &Path) -> Result<Document, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::default()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Document::default());
    }

    serde_json::from_slice(&bytes).map_err(StoreError::Parse)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "database.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Errors from the document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse document: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Chirp, User};

    fn chirp(id: u64, author_id: u64) -> Chirp {
        Chirp {
            id,
            body: format!("chirp {}", id),
            author_id,
        }
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("database.json"))
            .await
            .unwrap();

        let doc = store.read().await.unwrap();
        assert_eq!(doc, Document::default());
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = DocumentStore::open(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_entities() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("database.json"))
            .await
            .unwrap();

        let mut doc = Document::default();
        let mut user = User::new(1, "a@example.com".into(), "$argon2id$hash".into());
        user.refresh_token = "ab".repeat(32);
        user.refresh_token_expires_at = Some(chrono::Utc::now());
        user.is_chirpy_red = true;
        doc.users.insert(1, user);
        doc.chirps.insert(1, chirp(1, 1));

        let session = store.lock().await;
        session.save(&doc).await.unwrap();
        let loaded = session.load().await.unwrap();
        assert_eq!(loaded, doc);

        // save(load()) with no mutation is the identity
        session.save(&loaded).await.unwrap();
        assert_eq!(session.load().await.unwrap(), doc);
    }

    #[tokio::test]
    async fn test_open_seeds_counters_from_existing_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        std::fs::write(
            &path,
            r#"{"users": {"4": {"id": 4, "email": "x@example.com", "password": "h"}},
                "chirps": {"9": {"id": 9, "body": "hi", "author_id": 4}}}"#,
        )
        .unwrap();

        let store = DocumentStore::open(&path).await.unwrap();
        let mut session = store.lock().await;
        assert_eq!(session.ids().peek(EntityKind::User), 5);
        assert_eq!(session.ids().peek(EntityKind::Chirp), 10);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_and_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("database.json"))
            .await
            .unwrap();

        let mut session = store.lock().await;
        let mut doc = session.load().await.unwrap();
        let first = session
            .insert(&mut doc, |id| User::new(id, "a@example.com".into(), "h1".into()))
            .await
            .unwrap();
        assert_eq!(first.id, 1);

        let err = session
            .insert(&mut doc, |id| User::new(id, "a@example.com".into(), "h2".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(session.ids().peek(EntityKind::User), 2);
        assert_eq!(session.load().await.unwrap().users[&1].password, "h1");
    }

    #[tokio::test]
    async fn test_failed_save_rolls_back_id() {
        let dir = tempfile::tempdir().unwrap();
        // Parent directory does not exist, so every save fails.
        let store = DocumentStore::open(dir.path().join("missing").join("database.json"))
            .await
            .unwrap();

        let mut session = store.lock().await;
        let mut doc = session.load().await.unwrap();
        let err = session
            .insert(&mut doc, |id| chirp(id, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Persistence(_)));
        assert!(doc.chirps.is_empty());
        assert_eq!(session.ids().peek(EntityKind::Chirp), 1);
    }

    #[test]
    fn test_id_counters_are_independent() {
        let mut ids = IdAllocator::default();
        assert_eq!(ids.allocate(EntityKind::User), 1);
        assert_eq!(ids.allocate(EntityKind::Chirp), 1);
        assert_eq!(ids.allocate(EntityKind::Chirp), 2);
        ids.rollback(EntityKind::Chirp);
        assert_eq!(ids.peek(EntityKind::Chirp), 2);
        assert_eq!(ids.peek(EntityKind::User), 2);
    }
}
