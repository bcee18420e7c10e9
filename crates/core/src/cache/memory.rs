use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CacheError, ResultCache};
use crate::media::{MediaCriteria, TorrentItem};

/// Process-local result cache.
#[derive(Default)]
pub struct InMemoryResultCache {
    entries: RwLock<HashMap<String, Vec<TorrentItem>>>,
}

impl InMemoryResultCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultCache for InMemoryResultCache {
    async fn store(&self, media: &MediaCriteria, items: &[TorrentItem]) -> Result<usize, CacheError> {
        let mut entries = self.entries.write().await;
        let cached = entries.entry(media.cache_key()).or_default();

        for item in items {
            match cached.iter_mut().find(|c| c.info_hash == item.info_hash) {
                Some(existing) => *existing = item.clone(),
                None => cached.push(item.clone()),
            }
        }
        Ok(items.len())
    }

    async fn lookup(&self, media: &MediaCriteria) -> Result<Vec<TorrentItem>, CacheError> {
        let entries = self.entries.read().await;
        Ok(entries.get(&media.cache_key()).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_store_replaces_same_hash() {
        let cache = InMemoryResultCache::new();
        let media = MediaCriteria::movie();

        let mut item = fixtures::movie_item("abc", "Movie");
        cache.store(&media, &[item.clone()]).await.unwrap();
        item.availability = true;
        cache
            .store(&media, &[item, fixtures::movie_item("def", "Other")])
            .await
            .unwrap();

        let cached = cache.lookup(&media).await.unwrap();
        assert_eq!(cached.len(), 2);
        assert!(cached[0].availability);
    }

    #[tokio::test]
    async fn test_lookup_is_keyed_by_media() {
        let cache = InMemoryResultCache::new();
        cache
            .store(&MediaCriteria::episode("S01", "E01"), &[fixtures::series_item("abc", "Show")])
            .await
            .unwrap();

        assert!(cache.lookup(&MediaCriteria::episode("S01", "E02")).await.unwrap().is_empty());
        assert_eq!(cache.lookup(&MediaCriteria::episode("s01", "e01")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_movies_are_keyed_by_id() {
        let cache = InMemoryResultCache::new();
        let inception = MediaCriteria::movie().with_id("tt1375666");
        cache
            .store(&inception, &[fixtures::movie_item("abc", "Inception.2010")])
            .await
            .unwrap();

        let other = MediaCriteria::movie().with_id("tt0133093");
        assert!(cache.lookup(&other).await.unwrap().is_empty());
        assert_eq!(cache.lookup(&inception).await.unwrap().len(), 1);
    }
}
