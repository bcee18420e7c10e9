//! Filename metadata parsing.
//!
//! Reconciliation only needs two things from a filename: which seasons and
//! episodes it encodes, and its quality tags. The `FilenameParser` trait is the
//! seam for that; `SceneFilenameParser` is the default implementation for
//! scene-style release names.

mod scene;

pub use scene::SceneFilenameParser;

use crate::media::ParsedMetadata;

/// What a parser extracted from one filename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFilename {
    /// Season numbers, in order of appearance, without duplicates.
    pub seasons: Vec<u32>,
    /// Episode numbers, in order of appearance, without duplicates.
    pub episodes: Vec<u32>,
    pub metadata: ParsedMetadata,
}

/// Extracts structured metadata from a raw filename.
pub trait FilenameParser: Send + Sync {
    fn parse(&self, filename: &str) -> ParsedFilename;
}

/// Check whether a filename encodes the given season and episode.
pub fn season_episode_in_filename(
    parser: &dyn FilenameParser,
    filename: &str,
    season: u32,
    episode: u32,
) -> bool {
    let parsed = parser.parse(filename);
    parsed.seasons.contains(&season) && parsed.episodes.contains(&episode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_episode_match() {
        let parser = SceneFilenameParser::new();
        assert!(season_episode_in_filename(
            &parser,
            "Show.Name.S05E02.1080p.WEB-DL.mkv",
            5,
            2
        ));
    }

    #[test]
    fn test_season_episode_requires_both() {
        let parser = SceneFilenameParser::new();
        assert!(!season_episode_in_filename(&parser, "Show.Name.S05E03.mkv", 5, 2));
        assert!(!season_episode_in_filename(&parser, "Show.Name.S04E02.mkv", 5, 2));
    }

    #[test]
    fn test_season_pack_has_no_episode() {
        let parser = SceneFilenameParser::new();
        assert!(!season_episode_in_filename(&parser, "Show.Name.S05.1080p", 5, 2));
    }
}
