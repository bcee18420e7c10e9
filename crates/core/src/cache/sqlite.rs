//! SQLite-backed result cache.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};

use super::{CacheError, ResultCache};
use crate::media::{MediaCriteria, TorrentItem};

/// SQLite-backed result cache.
pub struct SqliteResultCache {
    conn: Mutex<Connection>,
}

impl SqliteResultCache {
    /// Open (or create) the cache database at `path`.
    pub fn new(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open(path).map_err(|e| CacheError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory cache (useful for testing).
    pub fn in_memory() -> Result<Self, CacheError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CacheError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CacheError> {
        conn.execute_batch(
            r#"
            -- One row per (request, torrent)
            CREATE TABLE IF NOT EXISTS cached_results (
                cache_key TEXT NOT NULL,
                info_hash TEXT NOT NULL,
                position INTEGER NOT NULL,
                item_json TEXT NOT NULL,
                cached_at TEXT NOT NULL,
                PRIMARY KEY (cache_key, info_hash)
            );

            CREATE INDEX IF NOT EXISTS idx_cached_results_key ON cached_results(cache_key);
            "#,
        )
        .map_err(|e| CacheError::Database(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn
            .lock()
            .map_err(|e| CacheError::Database(format!("connection lock poisoned: {}", e)))
    }

    /// Remove every cached row.
    pub fn clear(&self) -> Result<(), CacheError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM cached_results", [])
            .map_err(|e| CacheError::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ResultCache for SqliteResultCache {
    async fn store(&self, media: &MediaCriteria, items: &[TorrentItem]) -> Result<usize, CacheError> {
        let key = media.cache_key();
        let now = Utc::now().to_rfc3339();

        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| CacheError::Database(e.to_string()))?;

        // Appended after anything already cached for this key
        let base: i64 = tx
            .query_row(
                "SELECT COALESCE(MAX(position) + 1, 0) FROM cached_results WHERE cache_key = ?",
                params![key],
                |row| row.get(0),
            )
            .map_err(|e| CacheError::Database(e.to_string()))?;

        for (offset, item) in items.iter().enumerate() {
            let json =
                serde_json::to_string(item).map_err(|e| CacheError::Serialization(e.to_string()))?;
            tx.execute(
                "INSERT INTO cached_results (cache_key, info_hash, position, item_json, cached_at)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT(cache_key, info_hash) DO UPDATE SET
                    item_json = excluded.item_json,
                    cached_at = excluded.cached_at",
                params![key, item.info_hash, base + offset as i64, json, now],
            )
            .map_err(|e| CacheError::Database(e.to_string()))?;
        }

        tx.commit().map_err(|e| CacheError::Database(e.to_string()))?;
        tracing::debug!("Cached {} items under {}", items.len(), key);
        Ok(items.len())
    }

    async fn lookup(&self, media: &MediaCriteria) -> Result<Vec<TorrentItem>, CacheError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT item_json FROM cached_results WHERE cache_key = ? ORDER BY position",
            )
            .map_err(|e| CacheError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![media.cache_key()], |row| row.get::<_, String>(0))
            .map_err(|e| CacheError::Database(e.to_string()))?;

        let mut items = Vec::new();
        for row in rows {
            let json = row.map_err(|e| CacheError::Database(e.to_string()))?;
            let item = serde_json::from_str(&json)
                .map_err(|e| CacheError::Serialization(e.to_string()))?;
            items.push(item);
        }
        Ok(items)
    }
}
