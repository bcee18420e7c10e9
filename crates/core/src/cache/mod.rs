//! Result cache - persisted snapshots of reconciled torrent items.
//!
//! Snapshots are keyed by the media request so a later identical request can
//! be answered without querying providers again.

mod memory;
mod sqlite;
mod task;

pub use memory::InMemoryResultCache;
pub use sqlite::SqliteResultCache;
pub use task::CacheTask;

use async_trait::async_trait;
use thiserror::Error;

use crate::media::{MediaCriteria, TorrentItem};

/// Errors that can occur while persisting or reading results.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Caching cancelled")]
    Cancelled,

    #[error("Caching task failed: {0}")]
    TaskFailed(String),
}

/// Storage for reconciled items.
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Store a snapshot of items for a request.
    ///
    /// Items already cached for the same request and info hash are replaced.
    /// Returns the number of items written.
    async fn store(&self, media: &MediaCriteria, items: &[TorrentItem]) -> Result<usize, CacheError>;

    /// Items cached for a request, in the order they were stored.
    async fn lookup(&self, media: &MediaCriteria) -> Result<Vec<TorrentItem>, CacheError>;
}
