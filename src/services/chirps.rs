//! Chirp operations.

use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use crate::models::Chirp;
use crate::services::authorization::ensure_can_delete;

/// Listing order by chirp ID.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Order named by a `sort` query value. Anything but `desc` is ascending.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

/// Store a new chirp for `author_id`. The body must already be cleaned.
pub async fn create(store: &DocumentStore, author_id: u64, body: String) -> Result<Chirp> {
    let mut session = store.lock().await;
    let mut doc = session.load().await?;
    let chirp = session
        .insert(&mut doc, |id| Chirp {
            id,
            body,
            author_id,
        })
        .await?;

    tracing::info!(chirp_id = chirp.id, author_id, "Chirp created");
    Ok(chirp)
}

/// All chirps, optionally restricted to one author, sorted by ID.
pub async fn list(
    store: &DocumentStore,
    author_id: Option<u64>,
    order: SortOrder,
) -> Result<Vec<Chirp>> {
    let doc = store.read().await?;

    let mut chirps: Vec<Chirp> = doc
        .chirps
        .into_values()
        .filter(|c| author_id.map_or(true, |a| c.author_id == a))
        .collect();
    if order == SortOrder::Desc {
        chirps.reverse();
    }
    Ok(chirps)
}

/// One chirp by ID.
pub async fn get(store: &DocumentStore, chirp_id: u64) -> Result<Chirp> {
    store
        .read()
        .await?
        .chirps
        .remove(&chirp_id)
        .ok_or_else(|| AppError::NotFound("Chirp not found".to_string()))
}

/// Delete a chirp; only its author may do so.
pub async fn delete(store: &DocumentStore, chirp_id: u64, requesting_user_id: u64) -> Result<()> {
    let session = store.lock().await;
    let mut doc = session.load().await?;

    let chirp = doc
        .chirps
        .get(&chirp_id)
        .ok_or_else(|| AppError::NotFound("Chirp not found".to_string()))?;
    ensure_can_delete(chirp, requesting_user_id)?;

    doc.chirps.remove(&chirp_id);
    session.save(&doc).await?;

    tracing::info!(chirp_id, user_id = requesting_user_id, "Chirp deleted");
    Ok(())
}
