//! Torrent smart container.
//!
//! Owns the deduplicated set of candidate torrents for one search request and
//! reconciles debrid availability responses against it:
//! - **RealDebrid**: nested variant groups, first episode match wins
//! - **AllDebrid**: recursive folder walk with a running file index
//! - **Premiumize**: boolean arrays aligned with `get_items()` order
//!
//! Calls to `update_availability` are expected to be made one at a time; the
//! container takes `&mut self` for them and does no internal locking.

mod alldebrid;
mod premiumize;
mod realdebrid;
mod selection;
mod types;

pub use alldebrid::{explore_folders, TraversalMode};
pub use selection::select_largest;
pub use types::AvailabilityReport;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::cache::{CacheTask, ResultCache};
use crate::debrid::{ProviderKind, ReconcileError};
use crate::media::{MediaCriteria, Privacy, TorrentItem};
use crate::parser::{FilenameParser, SceneFilenameParser};

/// Deduplicated torrent candidates for a single media request.
///
/// Items are stored in first-seen order. That order is stable for the
/// lifetime of the container, which is what positional (Premiumize)
/// responses rely on.
pub struct TorrentSmartContainer {
    items: Vec<TorrentItem>,
    slots: HashMap<String, usize>,
    media: MediaCriteria,
    parser: Arc<dyn FilenameParser>,
}

impl TorrentSmartContainer {
    /// Build a container with the default scene filename parser.
    pub fn build(items: Vec<TorrentItem>, media: &MediaCriteria) -> Self {
        Self::build_with_parser(items, media, Arc::new(SceneFilenameParser::new()))
    }

    /// Build a container, deduplicating by info hash (first occurrence wins).
    ///
    /// Hashes are normalized to lowercase. Items without a hash cannot be
    /// keyed and are dropped.
    pub fn build_with_parser(
        items: Vec<TorrentItem>,
        media: &MediaCriteria,
        parser: Arc<dyn FilenameParser>,
    ) -> Self {
        debug!("Building items by info hash ({} items)", items.len());

        let mut kept = Vec::with_capacity(items.len());
        let mut slots = HashMap::with_capacity(items.len());

        for mut item in items {
            let hash = item.info_hash.trim().to_lowercase();
            if hash.is_empty() {
                debug!("Skipping item without info hash: {}", item.raw_title);
                continue;
            }
            if slots.contains_key(&hash) {
                debug!("Skipping duplicate info hash: {}", hash);
                continue;
            }
            debug!("Adding {} to items", hash);
            item.info_hash = hash.clone();
            slots.insert(hash, kept.len());
            kept.push(item);
        }

        Self {
            items: kept,
            slots,
            media: media.clone(),
            parser,
        }
    }

    /// All info hashes, in container order.
    pub fn get_hashes(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.info_hash.as_str()).collect()
    }

    /// All items, in the container's stable order.
    pub fn get_items(&self) -> &[TorrentItem] {
        &self.items
    }

    /// Current state of one item.
    pub fn get(&self, info_hash: &str) -> Option<&TorrentItem> {
        self.slot_of(info_hash).map(|slot| &self.items[slot])
    }

    /// Index of an item in `get_items()`.
    pub fn position_of(&self, info_hash: &str) -> Option<usize> {
        self.slot_of(info_hash)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The request this container was built for.
    pub fn media(&self) -> &MediaCriteria {
        &self.media
    }

    /// Public torrents with a resolved file.
    pub fn get_direct_torrentable(&self) -> Vec<&TorrentItem> {
        self.items
            .iter()
            .filter(|item| item.privacy == Privacy::Public && item.is_resolved())
            .collect()
    }

    /// Items worth offering to the user.
    ///
    /// A torrent source is kept only when a matching file was resolved in it.
    /// A bare magnet cannot be inspected before download, so it is always kept.
    pub fn get_best_matching(&self) -> Vec<&TorrentItem> {
        debug!("Amount of items: {}", self.items.len());
        self.items
            .iter()
            .filter(|item| {
                debug!(
                    "Checking {} (has torrent: {}, has file index: {})",
                    item.raw_title,
                    item.torrent_download.is_some(),
                    item.is_resolved()
                );
                item.is_magnet_only() || item.is_resolved()
            })
            .collect()
    }

    /// Apply one provider's availability response to the items.
    pub fn update_availability(
        &mut self,
        response: &Value,
        provider: ProviderKind,
        media: &MediaCriteria,
    ) -> Result<AvailabilityReport, ReconcileError> {
        let report = match provider {
            ProviderKind::RealDebrid => self.update_availability_realdebrid(response, media)?,
            ProviderKind::AllDebrid => self.update_availability_alldebrid(response, media)?,
            ProviderKind::Premiumize => self.update_availability_premiumize(response)?,
        };

        info!(
            provider = %provider,
            entries = report.entries,
            updated = report.updated,
            unknown = report.unknown_hashes.len(),
            "Availability updated"
        );
        Ok(report)
    }

    /// Persist a snapshot of the items in the background.
    ///
    /// The snapshot is taken now, so updates made after this call are not
    /// part of it. Dropping the returned task leaves it running. Must be
    /// called from within a Tokio runtime.
    pub fn cache_container_items(&self, cache: Arc<dyn ResultCache>) -> CacheTask {
        CacheTask::spawn(cache, self.media.clone(), self.items.clone())
    }

    /// Release the items, in container order.
    pub fn into_items(self) -> Vec<TorrentItem> {
        self.items
    }

    fn slot_of(&self, info_hash: &str) -> Option<usize> {
        self.slots.get(&info_hash.to_lowercase()).copied()
    }

    fn parser(&self) -> &dyn FilenameParser {
        self.parser.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{FileCandidate, MediaKind};
    use crate::testing::fixtures;

    #[test]
    fn test_build_keeps_first_duplicate() {
        let items = vec![
            fixtures::movie_item("aaa", "First"),
            fixtures::movie_item("bbb", "Other"),
            fixtures::movie_item("aaa", "Second"),
        ];
        let container = TorrentSmartContainer::build(items, &MediaCriteria::movie());

        assert_eq!(container.len(), 2);
        assert_eq!(container.get("aaa").unwrap().raw_title, "First");
        assert_eq!(container.get_hashes(), vec!["aaa", "bbb"]);
    }

    #[test]
    fn test_build_normalizes_hash_case() {
        let items = vec![
            fixtures::movie_item("ABC123", "Upper"),
            fixtures::movie_item("abc123", "Lower"),
        ];
        let container = TorrentSmartContainer::build(items, &MediaCriteria::movie());

        assert_eq!(container.len(), 1);
        assert_eq!(container.get_items()[0].info_hash, "abc123");
        assert_eq!(container.get("ABC123").unwrap().raw_title, "Upper");
    }

    #[test]
    fn test_build_drops_empty_hash() {
        let items = vec![
            fixtures::movie_item("", "No hash"),
            fixtures::movie_item("abc", "Hash"),
        ];
        let container = TorrentSmartContainer::build(items, &MediaCriteria::movie());
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn test_items_order_is_stable() {
        let items: Vec<_> = ["h3", "h1", "h2", "h1", "h4"]
            .iter()
            .map(|h| fixtures::movie_item(h, h))
            .collect();
        let container = TorrentSmartContainer::build(items, &MediaCriteria::movie());

        let first: Vec<_> = container.get_items().iter().map(|i| i.info_hash.clone()).collect();
        let second: Vec<_> = container.get_items().iter().map(|i| i.info_hash.clone()).collect();
        assert_eq!(first, vec!["h3", "h1", "h2", "h4"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_position_of_follows_item_order() {
        let items: Vec<_> = ["h3", "H1", "h1", "h2"]
            .iter()
            .map(|h| fixtures::movie_item(h, h))
            .collect();
        let container = TorrentSmartContainer::build(items, &MediaCriteria::movie());

        assert_eq!(container.position_of("h3"), Some(0));
        assert_eq!(container.position_of("h1"), Some(1));
        assert_eq!(container.position_of("H2"), Some(2));
        assert_eq!(container.position_of("missing"), None);
    }

    #[test]
    fn test_best_matching_mixed_set() {
        let magnet = fixtures::movie_item("magnet", "Magnet only");
        let unresolved = fixtures::torrent_file_item("unresolved", "Torrent no file", MediaKind::Movie);
        let mut resolved = fixtures::torrent_file_item("resolved", "Torrent with file", MediaKind::Movie);
        resolved.resolve_file(FileCandidate {
            file_index: 0,
            title: "movie.mkv".to_string(),
            size: 10,
        });

        let container = TorrentSmartContainer::build(
            vec![magnet, unresolved, resolved],
            &MediaCriteria::movie(),
        );
        let best: Vec<_> = container
            .get_best_matching()
            .iter()
            .map(|i| i.info_hash.as_str())
            .collect();

        assert_eq!(best, vec!["magnet", "resolved"]);
    }

    #[test]
    fn test_direct_torrentable_requires_public_and_file() {
        let mut public = fixtures::movie_item("public", "Public");
        public.file_index = Some(1);
        let mut private = fixtures::movie_item("private", "Private");
        private.privacy = Privacy::Private;
        private.file_index = Some(1);
        let unresolved = fixtures::movie_item("unresolved", "Unresolved");

        let container = TorrentSmartContainer::build(
            vec![public, private, unresolved],
            &MediaCriteria::movie(),
        );
        let direct = container.get_direct_torrentable();

        assert_eq!(direct.len(), 1);
        assert_eq!(direct[0].info_hash, "public");
    }

    #[tokio::test]
    async fn test_cache_snapshot_taken_at_call_time() {
        use crate::cache::{InMemoryResultCache, ResultCache};

        let media = MediaCriteria::movie();
        let mut container =
            TorrentSmartContainer::build(vec![fixtures::movie_item("abc", "Movie")], &media);
        let cache = Arc::new(InMemoryResultCache::new());

        let task = container.cache_container_items(cache.clone());
        container
            .update_availability(
                &fixtures::realdebrid_single_file("abc", "movie.mkv", 10),
                ProviderKind::RealDebrid,
                &media,
            )
            .unwrap();
        assert_eq!(task.wait().await.unwrap(), 1);

        let cached = cache.lookup(&media).await.unwrap();
        assert!(!cached[0].availability);
        assert!(container.get("abc").unwrap().availability);
    }

    #[test]
    fn test_unsupported_provider_leaves_items_untouched() {
        let items = vec![fixtures::movie_item("abc", "Movie")];
        let container = TorrentSmartContainer::build(items, &MediaCriteria::movie());
        let before = container.get_items().to_vec();

        let result = "torbox".parse::<ProviderKind>();

        assert!(matches!(result, Err(ReconcileError::UnsupportedProvider(_))));
        assert_eq!(container.get_items(), before.as_slice());
    }
}
