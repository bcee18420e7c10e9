//! Types describing what is searched for and the torrents found for it.

use serde::{Deserialize, Serialize};

/// Kind of media being requested (and the kind a torrent was found for).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    Series,
}

/// Whether a torrent comes from a public or a private tracker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Privacy {
    #[default]
    Public,
    Private,
}

/// What a single search request is looking for.
///
/// Season and episode keep the identifier as the caller sent it
/// (e.g. `"S05"`, `"E02"`); the numeric accessors strip the letter prefix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaCriteria {
    /// Catalog identifier of the title (e.g. an IMDb id like `tt0903747`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub kind: MediaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<String>,
}

impl MediaCriteria {
    /// Criteria for a movie request.
    pub fn movie() -> Self {
        Self {
            id: None,
            kind: MediaKind::Movie,
            season: None,
            episode: None,
        }
    }

    /// Criteria for a single episode of a series.
    pub fn episode(season: impl Into<String>, episode: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: MediaKind::Series,
            season: Some(season.into()),
            episode: Some(episode.into()),
        }
    }

    /// Attach the catalog identifier of the title.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Numeric season, e.g. `"S05"` -> 5.
    pub fn season_number(&self) -> Option<u32> {
        self.season.as_deref().and_then(strip_identifier)
    }

    /// Numeric episode, e.g. `"E02"` -> 2.
    pub fn episode_number(&self) -> Option<u32> {
        self.episode.as_deref().and_then(strip_identifier)
    }

    /// Both numbers, when the request names a specific episode.
    pub fn episode_target(&self) -> Option<(u32, u32)> {
        Some((self.season_number()?, self.episode_number()?))
    }

    /// Key under which results for this request are cached.
    ///
    /// Requests without an id share one key per kind (and episode).
    pub fn cache_key(&self) -> String {
        let target = match self.kind {
            MediaKind::Movie => "movie".to_string(),
            MediaKind::Series => format!(
                "series:{}:{}",
                self.season.as_deref().unwrap_or("").to_uppercase(),
                self.episode.as_deref().unwrap_or("").to_uppercase()
            ),
        };

        match self.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => format!("{}:{}", id.to_lowercase(), target),
            None => target,
        }
    }
}

fn strip_identifier(raw: &str) -> Option<u32> {
    raw.trim()
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .parse()
        .ok()
}

/// Quality tags attached to a torrent by the title parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedMetadata {
    /// Primary quality labels (e.g. `1080p`, `4K`).
    #[serde(default)]
    pub quality: Vec<String>,
    /// Release source specifiers (e.g. `WEBRIP`, `HDTV`, `CAM`).
    #[serde(default)]
    pub resolution: Vec<String>,
}

/// A file inside a torrent that a provider reported as a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub file_index: u32,
    pub title: String,
    pub size: u64,
}

/// One candidate torrent and, once resolved, the file selected inside it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TorrentItem {
    /// Info hash (lowercase hex).
    pub info_hash: String,
    pub raw_title: String,
    pub kind: MediaKind,
    #[serde(default)]
    pub privacy: Privacy,
    /// Raw .torrent source; `None` for a bare magnet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub torrent_download: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default)]
    pub availability: bool,
    #[serde(default)]
    pub parsed_data: ParsedMetadata,
}

impl TorrentItem {
    /// Create an unresolved item.
    pub fn new(info_hash: impl Into<String>, raw_title: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            info_hash: info_hash.into(),
            raw_title: raw_title.into(),
            kind,
            privacy: Privacy::Public,
            torrent_download: None,
            file_index: None,
            file_name: None,
            size: None,
            availability: false,
            parsed_data: ParsedMetadata::default(),
        }
    }

    /// Set the selected file and mark the item available, all at once.
    pub fn resolve_file(&mut self, file: FileCandidate) {
        self.file_index = Some(file.file_index);
        self.file_name = Some(file.title);
        self.size = Some(file.size);
        self.availability = true;
    }

    pub fn is_resolved(&self) -> bool {
        self.file_index.is_some()
    }

    /// True when the item only carries a magnet reference.
    pub fn is_magnet_only(&self) -> bool {
        self.torrent_download.is_none()
    }
}
