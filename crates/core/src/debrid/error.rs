//! Error types for availability reconciliation.

use thiserror::Error;

use super::ProviderKind;

/// Errors that can occur while applying a provider response.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Provider name not handled by any reconciliation strategy.
    #[error("Unsupported debrid provider: {0}")]
    UnsupportedProvider(String),

    /// Response references a torrent the container never saw.
    #[error("Unknown info hash in provider response: {0}")]
    UnknownInfoHash(String),

    /// Provider reported that the call itself failed.
    #[error("{provider} reported failure (status: {status})")]
    ProviderFailure { provider: ProviderKind, status: String },

    /// Response body does not have the expected shape.
    #[error("Malformed {provider} response: {reason}")]
    MalformedResponse { provider: ProviderKind, reason: String },

    /// Positional arrays do not line up with the container's items.
    #[error(
        "Positional response does not match items: expected {expected}, got {flags} flags and {transcoded} transcoded entries"
    )]
    PositionalMismatch {
        expected: usize,
        flags: usize,
        transcoded: usize,
    },
}

impl ReconcileError {
    pub fn malformed(provider: ProviderKind, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider,
            reason: reason.into(),
        }
    }
}
