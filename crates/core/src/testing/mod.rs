//! Testing utilities shared by unit and integration tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use reconciler_core::testing::fixtures;
//!
//! let items = vec![fixtures::series_item("abc", "Show S05 1080p")];
//! let response = fixtures::realdebrid_single_file("abc", "Show.S05E02.mkv", 1024);
//! ```

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::media::{MediaKind, TorrentItem};

    /// A magnet-only movie item.
    pub fn movie_item(info_hash: &str, title: &str) -> TorrentItem {
        TorrentItem::new(info_hash, title, MediaKind::Movie)
    }

    /// A magnet-only series item.
    pub fn series_item(info_hash: &str, title: &str) -> TorrentItem {
        TorrentItem::new(info_hash, title, MediaKind::Series)
    }

    /// An item backed by a downloaded .torrent source.
    pub fn torrent_file_item(info_hash: &str, title: &str, kind: MediaKind) -> TorrentItem {
        let mut item = TorrentItem::new(info_hash, title, kind);
        item.torrent_download = Some(format!("https://tracker.example/{}.torrent", info_hash));
        item
    }

    /// A RealDebrid body holding a single cached file for one hash.
    pub fn realdebrid_single_file(info_hash: &str, filename: &str, size: u64) -> Value {
        let mut body = serde_json::Map::new();
        body.insert(
            info_hash.to_string(),
            json!({"rd": [{"0": {"filename": filename, "filesize": size}}]}),
        );
        Value::Object(body)
    }

    /// A successful AllDebrid body with one instant magnet holding flat files.
    pub fn alldebrid_flat(info_hash: &str, files: &[(&str, u64)]) -> Value {
        let files: Vec<Value> = files
            .iter()
            .map(|(name, size)| json!({"n": name, "s": size}))
            .collect();
        json!({
            "status": "success",
            "data": {"magnets": [{"hash": info_hash, "instant": true, "files": files}]}
        })
    }

    /// A successful Premiumize body.
    pub fn premiumize(cached: &[bool], transcoded: &[bool]) -> Value {
        json!({
            "status": "success",
            "response": cached,
            "transcoded": transcoded
        })
    }
}
