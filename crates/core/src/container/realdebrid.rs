use serde_json::Value;
use tracing::{debug, warn};

use super::{AvailabilityReport, TorrentSmartContainer};
use crate::debrid::{parse_realdebrid, ProviderKind, RealDebridVariant, ReconcileError};
use crate::media::{FileCandidate, MediaCriteria, MediaKind};
use crate::parser::{season_episode_in_filename, FilenameParser};

impl TorrentSmartContainer {
    pub(super) fn update_availability_realdebrid(
        &mut self,
        response: &Value,
        media: &MediaCriteria,
    ) -> Result<AvailabilityReport, ReconcileError> {
        let entries = parse_realdebrid(response)?;
        let mut report = AvailabilityReport::new(ProviderKind::RealDebrid);
        report.skipped = response
            .as_object()
            .map_or(0, |o| o.len().saturating_sub(entries.len()));

        let target = media.episode_target();

        for entry in entries {
            report.entries += 1;
            let Some(slot) = self.slot_of(&entry.info_hash) else {
                report.unknown(&entry.info_hash);
                continue;
            };

            let kind = self.items[slot].kind;
            debug!("{} is a {:?}", entry.info_hash, kind);

            let files = match (kind, target) {
                (MediaKind::Series, Some((season, episode))) => {
                    first_episode_match(self.parser(), &entry.variants, season, episode)
                        .into_iter()
                        .collect()
                }
                (MediaKind::Series, None) => {
                    warn!(
                        "Series item {} but no season/episode requested",
                        entry.info_hash
                    );
                    Vec::new()
                }
                (MediaKind::Movie, _) => all_files(&entry.variants),
            };

            if self.update_file_details(slot, files) {
                report.updated += 1;
            }
        }

        Ok(report)
    }
}

/// First file, across all variant groups in order, encoding the episode.
///
/// Scanning stops at the first hit even if a larger match exists further on.
fn first_episode_match(
    parser: &dyn FilenameParser,
    variants: &[RealDebridVariant],
    season: u32,
    episode: u32,
) -> Option<FileCandidate> {
    variants
        .iter()
        .flat_map(|variant| variant.files.iter())
        .filter_map(|(index, file)| to_candidate(index, &file.filename, file.filesize))
        .find(|candidate| {
            debug!("{}", candidate.title);
            season_episode_in_filename(parser, &candidate.title, season, episode)
        })
}

fn all_files(variants: &[RealDebridVariant]) -> Vec<FileCandidate> {
    variants
        .iter()
        .flat_map(|variant| variant.files.iter())
        .filter_map(|(index, file)| to_candidate(index, &file.filename, file.filesize))
        .collect()
}

fn to_candidate(index: &str, filename: &str, size: u64) -> Option<FileCandidate> {
    match index.parse::<u32>() {
        Ok(file_index) => Some(FileCandidate {
            file_index,
            title: filename.to_string(),
            size,
        }),
        Err(_) => {
            warn!("Ignoring RealDebrid file with non-numeric index {:?}", index);
            None
        }
    }
}
