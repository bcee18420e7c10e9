use serde::Serialize;

use crate::debrid::{ProviderKind, ReconcileError};

/// Outcome of applying one provider response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AvailabilityReport {
    pub provider: ProviderKind,
    /// Response entries that carried availability data.
    pub entries: usize,
    /// Entries skipped as not cached.
    pub skipped: usize,
    /// Items marked available by this response.
    pub updated: usize,
    /// Hashes the provider reported that the container does not hold.
    pub unknown_hashes: Vec<String>,
    /// Why the whole response was rejected; nothing was applied when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl AvailabilityReport {
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            entries: 0,
            skipped: 0,
            updated: 0,
            unknown_hashes: Vec::new(),
            failure: None,
        }
    }

    /// Report for a response that was rejected as a whole.
    pub fn failed(provider: ProviderKind, error: &ReconcileError) -> Self {
        Self {
            failure: Some(error.to_string()),
            ..Self::new(provider)
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Per-item errors raised while applying the response.
    pub fn item_errors(&self) -> Vec<ReconcileError> {
        self.unknown_hashes
            .iter()
            .map(|hash| ReconcileError::UnknownInfoHash(hash.clone()))
            .collect()
    }

    pub(super) fn unknown(&mut self, info_hash: &str) {
        let error = ReconcileError::UnknownInfoHash(info_hash.to_string());
        tracing::warn!("{}: {}", self.provider, error);
        self.unknown_hashes.push(info_hash.to_string());
    }
}
