use serde_json::Value;
use tracing::{debug, warn};

use super::{AvailabilityReport, TorrentSmartContainer};
use crate::debrid::{parse_alldebrid, AllDebridNode, ProviderKind, ReconcileError};
use crate::media::{FileCandidate, MediaCriteria, MediaKind};
use crate::parser::{season_episode_in_filename, FilenameParser};

/// How leaves are treated while walking an AllDebrid file tree.
#[derive(Clone, Copy)]
pub enum TraversalMode<'a> {
    /// Every file is a candidate; the index restarts at 1 on each folder level.
    Movie,
    /// Only files encoding the episode are candidates; the index runs on
    /// across folders.
    Episode {
        parser: &'a dyn FilenameParser,
        season: u32,
        episode: u32,
    },
}

/// Walk `nodes`, collecting candidate files into `files`.
///
/// Each file consumes one index whether or not it is kept. Folders consume
/// none themselves; the walk continues from whatever index their contents
/// left. Returns the next free index.
pub fn explore_folders(
    nodes: &[AllDebridNode],
    files: &mut Vec<FileCandidate>,
    file_index: u32,
    mode: TraversalMode<'_>,
) -> u32 {
    let mut file_index = match mode {
        TraversalMode::Movie => 1,
        TraversalMode::Episode { .. } => file_index,
    };

    for node in nodes {
        if let Some(children) = &node.e {
            file_index = explore_folders(children, files, file_index, mode);
            continue;
        }

        let keep = match mode {
            TraversalMode::Movie => true,
            TraversalMode::Episode {
                parser,
                season,
                episode,
            } => season_episode_in_filename(parser, &node.n, season, episode),
        };

        if keep {
            files.push(FileCandidate {
                file_index,
                title: node.n.clone(),
                size: node.s.unwrap_or(0),
            });
        }
        file_index += 1;
    }

    file_index
}

impl TorrentSmartContainer {
    pub(super) fn update_availability_alldebrid(
        &mut self,
        response: &Value,
        media: &MediaCriteria,
    ) -> Result<AvailabilityReport, ReconcileError> {
        let magnets = parse_alldebrid(response)?;
        let mut report = AvailabilityReport::new(ProviderKind::AllDebrid);
        let target = media.episode_target();

        for magnet in magnets {
            if !magnet.instant {
                debug!("{} is not instantly available", magnet.hash);
                report.skipped += 1;
                continue;
            }
            report.entries += 1;

            let Some(slot) = self.slot_of(&magnet.hash) else {
                report.unknown(&magnet.hash);
                continue;
            };

            let mode = match (self.items[slot].kind, target) {
                (MediaKind::Movie, _) => TraversalMode::Movie,
                (MediaKind::Series, Some((season, episode))) => TraversalMode::Episode {
                    parser: self.parser(),
                    season,
                    episode,
                },
                (MediaKind::Series, None) => {
                    warn!("Series item {} but no season/episode requested", magnet.hash);
                    continue;
                }
            };

            let mut files = Vec::new();
            explore_folders(&magnet.files, &mut files, 1, mode);

            if self.update_file_details(slot, files) {
                report.updated += 1;
            }
        }

        Ok(report)
    }
}
