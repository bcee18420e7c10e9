use serde_json::Value;

use super::{AvailabilityReport, TorrentSmartContainer};
use crate::debrid::{parse_premiumize, ProviderKind, ReconcileError};

impl TorrentSmartContainer {
    /// Apply a Premiumize cache check.
    ///
    /// Precondition: the response arrays were produced for the hashes in
    /// `get_items()` order. Position `i` of each array describes
    /// `get_items()[i]`; nothing in the payload identifies the item. Only
    /// `availability` is touched, never the file fields.
    pub(super) fn update_availability_premiumize(
        &mut self,
        response: &Value,
    ) -> Result<AvailabilityReport, ReconcileError> {
        let flags = parse_premiumize(response)?;
        let expected = self.items.len();

        if flags.cached.len() != expected || flags.transcoded.len() != expected {
            return Err(ReconcileError::PositionalMismatch {
                expected,
                flags: flags.cached.len(),
                transcoded: flags.transcoded.len(),
            });
        }

        let mut report = AvailabilityReport::new(ProviderKind::Premiumize);
        for (item, (cached, transcoded)) in self
            .items
            .iter_mut()
            .zip(flags.cached.into_iter().zip(flags.transcoded))
        {
            if !cached {
                report.skipped += 1;
                continue;
            }
            report.entries += 1;
            item.availability = transcoded;
            if transcoded {
                report.updated += 1;
            }
        }

        Ok(report)
    }
}
