//! Scene-style release name parser.
//!
//! Handles names like:
//! - "Show.Name.S05E02.1080p.WEB-DL.mkv"
//! - "Show Name S01E01-E03 720p HDTV"
//! - "Show.Name.2x05.WEBRip"
//! - "Show Name Season 1 Episode 4"
//! - "Show.Name.S01-S03.Complete.BluRay"

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::{FilenameParser, ParsedFilename};
use crate::media::ParsedMetadata;

/// S01E02, optionally followed by more episodes (E03, -E03, -03)
static SXXEXX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bs(\d{1,2})\s?e(\d{1,3})((?:-?e\d{1,3}|-\d{1,3}\b)*)").unwrap()
});

/// One trailing episode inside the SXXEXX tail
static TAIL_EPISODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(-)?e?(\d{1,3})").unwrap());

/// 1x02
static NXNN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})x(\d{2,3})\b").unwrap());

/// Season 1 Episode 2
static VERBOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bseason\s*(\d{1,2})\s*episode\s*(\d{1,3})\b").unwrap());

/// Season packs: S01, S01-S03, S01-03
static SEASON_PACK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bs(\d{1,2})(?:\s?-\s?s?(\d{1,2}))?\b").unwrap());

/// Season 2, Seasons 1-3
static VERBOSE_SEASON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bseasons?\s*(\d{1,2})(?:\s?-\s?(\d{1,2}))?\b").unwrap());

/// Standalone episode marker, used only when nothing else matched
static LONE_EPISODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:e|ep|episode)\s?(\d{1,3})\b").unwrap());

static QUALITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(2160p|1080p|720p|576p|480p|360p|4k|uhd)\b").unwrap());

static SOURCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(web-?rip|hd-?rip|br-?rip|bd-?rip|tv-?rip|vod-?rip|dvd-?rip|vhs-?rip|web-?dl|blu-?ray|remux|hdtv|pdtv|dsr|hd-?cam|cam-?rip|cam|hd-?ts|telesync|ts|telecine|tc|r5|dvd-?scr|screener|workprint)\b",
    )
    .unwrap()
});

static EXTENSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(mkv|mp4|avi|mov|wmv|m4v|webm|ts|m2ts|mpg|mpeg|srt|nfo)$").unwrap()
});

/// Parser for scene-style release names.
#[derive(Debug, Clone, Default)]
pub struct SceneFilenameParser;

impl SceneFilenameParser {
    pub fn new() -> Self {
        Self
    }
}

impl FilenameParser for SceneFilenameParser {
    fn parse(&self, filename: &str) -> ParsedFilename {
        // Only the last path component carries the release name
        let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
        let name = EXTENSION_RE.replace(name, "");
        let cleaned = name.replace(['.', '_'], " ");

        let mut parsed = ParsedFilename::default();

        for caps in SXXEXX_RE.captures_iter(&cleaned) {
            push_number(&mut parsed.seasons, caps.get(1).map(|m| m.as_str()));
            let first = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
            let Some(first) = first else { continue };
            push_unique(&mut parsed.episodes, first);

            let mut previous = first;
            let tail = caps.get(3).map(|m| m.as_str()).unwrap_or("");
            for ep in TAIL_EPISODE_RE.captures_iter(tail) {
                let Some(number) = ep.get(2).and_then(|m| m.as_str().parse::<u32>().ok()) else {
                    continue;
                };
                if ep.get(1).is_some() && number > previous {
                    // Range: E01-E03 covers 1, 2 and 3
                    for n in previous + 1..=number {
                        push_unique(&mut parsed.episodes, n);
                    }
                } else {
                    push_unique(&mut parsed.episodes, number);
                }
                previous = number;
            }
        }

        for re in [&*NXNN_RE, &*VERBOSE_RE] {
            for caps in re.captures_iter(&cleaned) {
                push_number(&mut parsed.seasons, caps.get(1).map(|m| m.as_str()));
                push_number(&mut parsed.episodes, caps.get(2).map(|m| m.as_str()));
            }
        }

        for re in [&*SEASON_PACK_RE, &*VERBOSE_SEASON_RE] {
            for caps in re.captures_iter(&cleaned) {
                let start = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
                let end = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
                match (start, end) {
                    (Some(start), Some(end)) if end >= start => {
                        for n in start..=end {
                            push_unique(&mut parsed.seasons, n);
                        }
                    }
                    (Some(start), _) => push_unique(&mut parsed.seasons, start),
                    _ => {}
                }
            }
        }

        if parsed.episodes.is_empty() {
            for caps in LONE_EPISODE_RE.captures_iter(&cleaned) {
                push_number(&mut parsed.episodes, caps.get(1).map(|m| m.as_str()));
            }
        }

        parsed.metadata = parse_metadata(&cleaned);
        parsed
    }
}

fn parse_metadata(cleaned: &str) -> ParsedMetadata {
    let mut metadata = ParsedMetadata::default();

    for m in QUALITY_RE.find_iter(cleaned) {
        let tag = canonical_quality(m.as_str());
        if !metadata.quality.contains(&tag) {
            metadata.quality.push(tag);
        }
    }

    for m in SOURCE_RE.find_iter(cleaned) {
        let tag = canonical_source(m.as_str());
        if !metadata.resolution.contains(&tag) {
            metadata.resolution.push(tag);
        }
    }

    metadata
}

fn canonical_quality(raw: &str) -> String {
    let lower = raw.to_lowercase();
    match lower.as_str() {
        "4k" | "uhd" => lower.to_uppercase(),
        _ => lower,
    }
}

fn canonical_source(raw: &str) -> String {
    let compact = raw.replace('-', "").to_uppercase();
    match compact.as_str() {
        "WEBDL" => "WEB-DL".to_string(),
        "CAMRIP" => "CAM".to_string(),
        "HDTS" | "TELESYNC" => "TS".to_string(),
        "TELECINE" => "TC".to_string(),
        "SCREENER" => "DVDSCR".to_string(),
        _ => compact,
    }
}

fn push_number(target: &mut Vec<u32>, raw: Option<&str>) {
    if let Some(n) = raw.and_then(|s| s.parse::<u32>().ok()) {
        push_unique(target, n);
    }
}

fn push_unique(target: &mut Vec<u32>, n: u32) {
    if !target.contains(&n) {
        target.push(n);
    }
}
