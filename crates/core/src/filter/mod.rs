//! Stream filters applied to candidate items before reconciliation.

mod quality_exclusion;

pub use quality_exclusion::{QualityExclusionFilter, CAMS, RIPS};

use crate::media::{ParsedMetadata, TorrentItem};

/// Anything carrying parser-produced quality tags.
pub trait HasParsedMetadata {
    fn parsed_data(&self) -> &ParsedMetadata;
}

impl HasParsedMetadata for TorrentItem {
    fn parsed_data(&self) -> &ParsedMetadata {
        &self.parsed_data
    }
}

/// A filter stage over a list of streams.
pub trait StreamFilter<T>: Send + Sync {
    /// Keep the streams this filter allows, preserving order.
    fn filter(&self, items: Vec<T>) -> Vec<T>;

    /// Whether running this filter can remove anything.
    fn can_filter(&self) -> bool;
}

/// Run `items` through each filter in turn, skipping no-op filters.
pub fn apply_filters<T>(items: Vec<T>, filters: &[&dyn StreamFilter<T>]) -> Vec<T> {
    filters.iter().fold(items, |items, filter| {
        if filter.can_filter() {
            filter.filter(items)
        } else {
            items
        }
    })
}
