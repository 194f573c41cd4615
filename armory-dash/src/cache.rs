//! Owned, explicitly reloaded copy of the `characters` table

use armory_common::db::load_all_characters;
use armory_common::{Character, Result};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Character dataset held by the dashboard
///
/// Readers get a cheap [`Arc`] snapshot; [`reload`](Self::reload) swaps in a
/// fresh full scan. Clones share the same dataset.
#[derive(Clone)]
pub struct CharacterCache {
    pool: SqlitePool,
    characters: Arc<RwLock<Arc<Vec<Character>>>>,
}

impl CharacterCache {
    /// Create the cache and perform the initial load
    pub async fn load(pool: SqlitePool) -> Result<Self> {
        let characters = load_all_characters(&pool).await?;
        tracing::info!(rows = characters.len(), "Character cache loaded");
        Ok(Self {
            pool,
            characters: Arc::new(RwLock::new(Arc::new(characters))),
        })
    }

    /// Re-read the full table, returning the new row count
    ///
    /// On error the previous dataset stays in place.
    pub async fn reload(&self) -> Result<usize> {
        let characters = load_all_characters(&self.pool).await?;
        let rows = characters.len();
        *self.characters.write().await = Arc::new(characters);
        tracing::info!(rows, "Character cache reloaded");
        Ok(rows)
    }

    /// Current dataset
    pub async fn snapshot(&self) -> Arc<Vec<Character>> {
        Arc::clone(&*self.characters.read().await)
    }
}
