use crate::media::FileCandidate;

use super::TorrentSmartContainer;

/// Pick the largest file; on equal sizes the first one wins.
pub fn select_largest(files: Vec<FileCandidate>) -> Option<FileCandidate> {
    let mut best: Option<FileCandidate> = None;
    for file in files {
        if best.as_ref().is_none_or(|b| file.size > b.size) {
            best = Some(file);
        }
    }
    best
}

impl TorrentSmartContainer {
    /// Resolve the item in `slot` to its largest candidate file.
    ///
    /// Returns false (item untouched) when there are no candidates.
    pub(super) fn update_file_details(&mut self, slot: usize, files: Vec<FileCandidate>) -> bool {
        let Some(file) = select_largest(files) else {
            return false;
        };
        let item = &mut self.items[slot];
        tracing::debug!(
            "Selected file {} ({}) for {}",
            file.file_index,
            file.title,
            item.info_hash
        );
        item.resolve_file(file);
        true
    }
}
