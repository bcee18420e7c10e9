use std::collections::HashSet;

use tracing::debug;

use super::{HasParsedMetadata, StreamFilter};
use crate::config::FilterConfig;

/// Rip sources, excluded together by the `RIPS` token.
pub const RIPS: &[&str] = &["HDRIP", "BRRIP", "BDRIP", "WEBRIP", "TVRIP", "VODRIP"];

/// Low-quality capture sources, excluded together by the `CAM` token.
pub const CAMS: &[&str] = &[
    "CAM", "TS", "TC", "R5", "DVDSCR", "HDTV", "PDTV", "DSR", "WORKPRINT", "VHSRIP", "HDCAM",
];

/// Rejects streams whose quality tags hit a configured exclusion list.
///
/// Tokens are compared case-insensitively. Besides literal matches, the
/// `RIPS` token excludes every tag in [`RIPS`] and the `CAM` token every tag
/// in [`CAMS`]; both groups are checked against the resolution tags only.
#[derive(Debug, Clone)]
pub struct QualityExclusionFilter {
    excluded: HashSet<String>,
    exclude_rips: bool,
    exclude_cams: bool,
}

impl QualityExclusionFilter {
    pub fn new<I, S>(exclusion: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let excluded: HashSet<String> = exclusion
            .into_iter()
            .map(|token| token.as_ref().trim().to_uppercase())
            .filter(|token| !token.is_empty())
            .collect();
        let exclude_rips = excluded.contains("RIPS");
        let exclude_cams = excluded.contains("CAM");

        Self {
            excluded,
            exclude_rips,
            exclude_cams,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(&config.exclusion)
    }

    /// Whether a single stream passes the filter.
    pub fn is_allowed<T: HasParsedMetadata>(&self, stream: &T) -> bool {
        let parsed = stream.parsed_data();
        debug!(
            "Checking stream: quality={:?}, resolution={:?}",
            parsed.quality, parsed.resolution
        );

        if let Some(tag) = parsed.quality.iter().find(|q| self.is_excluded(q)) {
            debug!("Stream excluded due to main quality: {}", tag);
            return false;
        }

        if let Some(tag) = parsed.resolution.iter().find(|r| self.is_excluded(r)) {
            debug!("Stream excluded due to quality tag: {}", tag);
            return false;
        }

        if self.exclude_rips {
            if let Some(tag) = parsed.resolution.iter().find(|r| in_group(RIPS, r)) {
                debug!("Stream excluded due to RIP: {}", tag);
                return false;
            }
        }

        if self.exclude_cams {
            if let Some(tag) = parsed.resolution.iter().find(|r| in_group(CAMS, r)) {
                debug!("Stream excluded due to CAM: {}", tag);
                return false;
            }
        }

        debug!("Stream allowed");
        true
    }

    fn is_excluded(&self, tag: &str) -> bool {
        self.excluded.contains(&tag.to_uppercase())
    }
}

fn in_group(group: &[&str], tag: &str) -> bool {
    let upper = tag.to_uppercase();
    group.contains(&upper.as_str())
}

impl<T: HasParsedMetadata> StreamFilter<T> for QualityExclusionFilter {
    fn filter(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().filter(|item| self.is_allowed(item)).collect()
    }

    fn can_filter(&self) -> bool {
        !self.excluded.is_empty()
    }
}
